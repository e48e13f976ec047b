//! Draft command - inspect and edit the saved return draft

use crate::cmd::{load_rate_tables, DEFAULT_STORE};
use crate::core::{Draft, DraftStore, FilerInput, InputField, RateTableSource, WizardStep};
use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct DraftCommand {
    /// Draft file
    #[arg(long, env = "TAXFLOW_STORE", default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Select the tax year
    #[arg(short, long)]
    year: Option<String>,

    /// Set a field, e.g. --set w2Wages=60000 (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Move to the next step
    #[arg(long, conflicts_with = "back")]
    next: bool,

    /// Move to the previous step
    #[arg(long)]
    back: bool,

    /// Discard the draft and start over
    #[arg(long)]
    reset: bool,

    /// JSON file of extra or replacement rate tables keyed by year
    #[arg(long)]
    rates: Option<PathBuf>,
}

#[derive(Debug, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl DraftCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let store = DraftStore::new(&self.store);
        let mut draft = if self.reset {
            Draft::default()
        } else {
            store.load()
        };

        if let Some(year) = &self.year {
            let tables = load_rate_tables(self.rates.as_deref())?;
            if tables.rate_table(year).is_none() {
                anyhow::bail!(
                    "No rate table for tax year {} (available: {})",
                    year,
                    tables.years().join(", ")
                );
            }
            draft.year = year.trim().to_string();
        }

        for assignment in &self.set {
            draft.data = set_field(&draft.data, assignment)?;
        }

        if self.next && !draft.advance() {
            if draft.current_step() == WizardStep::Review {
                println!("Already on the last step.");
            } else {
                println!("First name, last name, SSN and filing status are required to continue.");
            }
        }
        if self.back {
            draft.back();
        }

        if store.save(&mut draft)? {
            log::debug!("Draft written to {}", store.path().display());
        }
        print_draft(&draft)
    }
}

/// Apply one `field=value` assignment, validated against the input field table
fn set_field(data: &FilerInput, assignment: &str) -> anyhow::Result<FilerInput> {
    let Some((key, raw)) = assignment.split_once('=') else {
        anyhow::bail!("Expected FIELD=VALUE, got '{}'", assignment);
    };
    let Some(field) = FilerInput::field(key.trim()) else {
        anyhow::bail!(
            "Unknown field '{}'. Run `taxflow schema fields` for the list.",
            key.trim()
        );
    };

    let value = parse_value(field, raw.trim())?;
    let mut record = serde_json::to_value(data)?;
    if let Value::Object(map) = &mut record {
        map.insert(field.name.to_string(), value);
    }
    Ok(serde_json::from_value(record)?)
}

fn parse_value(field: &InputField, raw: &str) -> anyhow::Result<Value> {
    let value = match field.kind {
        "money" | "text" => Value::String(raw.to_string()),
        "flag" => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Value::Bool(true),
            "false" | "no" | "n" | "0" | "" => Value::Bool(false),
            _ => anyhow::bail!("{} expects true or false, got '{}'", field.name, raw),
        },
        "count" => {
            let count: u32 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("{} expects a whole number, got '{}'", field.name, raw))?;
            Value::from(count)
        }
        _ => anyhow::bail!(
            "{} is a list; edit it in a JSON file and use `taxflow import`",
            field.name
        ),
    };
    Ok(value)
}

fn print_draft(draft: &Draft) -> anyhow::Result<()> {
    let step = draft.current_step();
    println!();
    println!(
        "Step {} of {}: {} ({})",
        step.index() + 1,
        WizardStep::ALL.len(),
        step.title(),
        step.description()
    );
    println!("Tax year: {}", draft.year);
    match draft.saved {
        Some(saved) => println!("Saved: {}", saved.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Not saved yet"),
    }

    let rows = filled_fields(&draft.data)?;
    if rows.is_empty() {
        println!("No answers yet");
    } else {
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
    }
    Ok(())
}

fn filled_fields(data: &FilerInput) -> anyhow::Result<Vec<FieldRow>> {
    let record = serde_json::to_value(data)?;
    let rows = FilerInput::input_fields()
        .iter()
        .filter_map(|field| {
            let value = match record.get(field.name)? {
                Value::String(s) if !s.trim().is_empty() => s.clone(),
                Value::Bool(true) => "yes".to_string(),
                Value::Number(n) if n.as_u64() != Some(0) => n.to_string(),
                Value::Array(items) if !items.is_empty() => format!("{} entries", items.len()),
                _ => return None,
            };
            Some(FieldRow {
                name: field.name,
                value,
            })
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sets_money_flag_and_count() {
        let data = FilerInput::default();
        let data = set_field(&data, "w2Wages=60,000").unwrap();
        let data = set_field(&data, "childTaxCredit=yes").unwrap();
        let data = set_field(&data, "dependents=2").unwrap();
        assert_eq!(data.w2_wages.value(), dec!(60000));
        assert!(data.child_tax_credit);
        assert_eq!(data.dependents, 2);
    }

    #[test]
    fn alias_sets_canonical_field() {
        let data = set_field(&FilerInput::default(), "stateIncomeTax=900").unwrap();
        assert_eq!(data.state_income_tax.value(), dec!(900));
    }

    #[test]
    fn rejects_bad_assignments() {
        let data = FilerInput::default();
        assert!(set_field(&data, "w2Wages").is_err());
        assert!(set_field(&data, "salary=1").is_err());
        assert!(set_field(&data, "dependents=two").is_err());
        assert!(set_field(&data, "hasForeignAssets=maybe").is_err());
        assert!(set_field(&data, "giftsReceived=1").is_err());
    }

    #[test]
    fn lists_only_filled_fields() {
        let data = FilerInput {
            first_name: "Ada".to_string(),
            dependents: 1,
            ..Default::default()
        };
        let rows = filled_fields(&data).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["firstName", "dependents"]);
    }
}
