//! Summary command - federal estimate with income, tax and payment breakdowns

use crate::cmd::{format_usd, load_rate_tables, read_input, DEFAULT_STORE};
use crate::core::{
    calculate_for_year, DraftStore, FilerInput, RateTable, RateTableSource, Settlement,
    TaxResult, DEFAULT_YEAR,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// JSON file with the filer input ("-" for stdin); the saved draft when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Tax year (defaults to the draft's year, or 2024)
    #[arg(short, long)]
    year: Option<String>,

    /// JSON file of extra or replacement rate tables keyed by year
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Draft file read when no input is given
    #[arg(long, env = "TAXFLOW_STORE", default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output label/amount rows as CSV
    #[arg(long)]
    csv: bool,
}

/// Summary data for JSON output
#[derive(Debug, Serialize)]
struct SummaryData<'a> {
    year: &'a str,
    filing_status: &'a str,
    settlement: &'static str,
    result: &'a TaxResult,
    notices: Vec<String>,
}

/// Row for the table and CSV output
#[derive(Debug, Clone, Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Section")]
    section: &'static str,

    #[tabled(rename = "Item")]
    item: String,

    #[tabled(rename = "Amount")]
    amount: String,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tables = load_rate_tables(self.rates.as_deref())?;
        let (input, draft_year) = match &self.input {
            Some(path) => (read_input(path)?, None),
            None => {
                let draft = DraftStore::new(&self.store).load();
                (draft.data, Some(draft.year))
            }
        };
        let year = self
            .year
            .clone()
            .or(draft_year)
            .unwrap_or_else(|| DEFAULT_YEAR.to_string());

        let Some(table) = tables.rate_table(&year) else {
            anyhow::bail!(
                "No rate table for tax year {} (available: {})",
                year,
                tables.years().join(", ")
            );
        };

        let Some(result) = calculate_for_year(&input, &tables, &year) else {
            if self.json {
                println!("{{}}");
            } else {
                println!("Complete earlier steps to see your summary (a filing status is required).");
            }
            return Ok(());
        };

        let notices = notices(&result, table);
        if self.json {
            self.print_json(&input, &year, &result, notices)
        } else if self.csv {
            self.write_csv(&result)
        } else {
            self.print_summary(&year, &result, &notices);
            Ok(())
        }
    }

    fn print_summary(&self, year: &str, result: &TaxResult, notices: &[String]) {
        println!();
        match result.settlement() {
            Settlement::Refund(amount) => {
                println!("{} ESTIMATED REFUND: {}", year, format_usd(amount))
            }
            Settlement::Owed(amount) => {
                println!("{} ESTIMATED AMOUNT OWED: {}", year, format_usd(amount))
            }
            Settlement::Even => println!("{} ESTIMATE: nothing owed, no refund", year),
        }
        println!();

        let rows: Vec<SummaryRow> = summary_rows(result)
            .into_iter()
            .map(|(section, item, amount)| SummaryRow {
                section,
                item,
                amount: format_usd(amount),
            })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        if !notices.is_empty() {
            println!();
            for notice in notices {
                println!("! {}", notice);
            }
        }
        println!();
        println!("This is an estimate only. AMT uses only SALT as an add-back and several");
        println!("phase-outs are not modeled. Consult a tax professional before filing.");
    }

    fn print_json(
        &self,
        input: &FilerInput,
        year: &str,
        result: &TaxResult,
        notices: Vec<String>,
    ) -> anyhow::Result<()> {
        let settlement = match result.settlement() {
            Settlement::Refund(_) => "refund",
            Settlement::Owed(_) => "owed",
            Settlement::Even => "even",
        };
        let filing_status = input
            .status()
            .map_or(input.filing_status.trim(), |s| s.key());
        let data = SummaryData {
            year,
            filing_status,
            settlement,
            result,
            notices,
        };
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }

    fn write_csv(&self, result: &TaxResult) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for (section, item, amount) in summary_rows(result) {
            wtr.serialize(SummaryRow {
                section,
                item,
                amount: format!("{:.2}", amount),
            })?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Review screen rows. Zero income and payment lines are skipped.
fn summary_rows(r: &TaxResult) -> Vec<(&'static str, String, Decimal)> {
    let mut rows = Vec::new();

    let income = [
        ("W-2 Wages", r.income.wages),
        ("Domestic Interest", r.income.domestic_interest),
        ("Ordinary Dividends", r.income.domestic_dividends),
        ("  Qualified Dividends", r.income.qualified_dividends),
        ("Long-Term Capital Gains", r.income.long_term_capital_gains),
        ("Foreign Interest", r.income.foreign_interest),
        ("Foreign Dividends", r.income.foreign_dividends),
        ("Business (net)", r.income.business_net),
        ("Pension (taxable)", r.income.pension_taxable),
        ("Misc / 1099", r.income.misc_total),
    ];
    for (label, amount) in income {
        if amount > Decimal::ZERO {
            rows.push(("Income", label.to_string(), amount));
        }
    }
    rows.push(("Income", "Total Income".to_string(), r.income.total));

    let deduction_label = if r.uses_itemized() {
        "Deduction (Itemized)"
    } else {
        "Deduction (Standard)"
    };
    let tax = [
        ("Adjustments", r.adjustments.total),
        ("Adjusted Gross Income (AGI)", r.agi),
        (deduction_label, r.deductions.used),
        ("Taxable Income", r.taxable_income),
        ("Tax on Ordinary Income", r.ordinary_tax),
        ("Tax on Qualified Div. / LTCG", r.preferential_tax),
        ("Regular Tax", r.regular_tax),
        ("AMT (additional)", r.amt_owed),
        ("Self-Employment Tax", r.self_employment_tax),
        ("Credits", r.credits.total),
        ("Total Tax", r.total_tax),
    ];
    for (label, amount) in tax {
        rows.push(("Tax", label.to_string(), amount));
    }

    let payments = [
        ("W-2 Federal Withheld", r.payments.federal_withheld),
        ("1099 / Other Withheld", r.payments.misc_withheld),
        ("Estimated Tax Payments", r.payments.estimated_payments),
    ];
    for (label, amount) in payments {
        if amount > Decimal::ZERO {
            rows.push(("Payments", label.to_string(), amount));
        }
    }
    rows.push(("Payments", "Total Payments".to_string(), r.payments.total));

    rows
}

fn notices(result: &TaxResult, table: &RateTable) -> Vec<String> {
    let thresholds = &table.compliance_thresholds;
    let mut notices = Vec::new();

    if result.payments.state_tax_withheld > Decimal::ZERO {
        notices.push(format!(
            "State tax withheld: {}. This does not affect your federal return; use it for your state return.",
            format_usd(result.payments.state_tax_withheld)
        ));
    }
    if result.amt_owed > Decimal::ZERO {
        notices.push(format!(
            "Alternative Minimum Tax added {} to your tax bill.",
            format_usd(result.amt_owed)
        ));
    }
    if result.flags.fbar {
        notices.push(format!(
            "FBAR required: foreign bank balance reached {}. File FinCEN Form 114 separately.",
            format_usd(thresholds.fbar_threshold)
        ));
    }
    if result.flags.fatca {
        notices.push(format!(
            "Form 8938 (FATCA) may be required: foreign assets exceed {}.",
            format_usd(thresholds.fatca_threshold_single)
        ));
    }
    if result.flags.foreign_gift {
        notices.push(format!(
            "Form 3520 required: gift over {} received from a foreign person.",
            format_usd(thresholds.foreign_gift_threshold)
        ));
    }
    if result.flags.donor_gift_return {
        notices.push(format!(
            "A gift above the {} annual exclusion was received; the donor may need to file Form 709.",
            format_usd(thresholds.annual_gift_exclusion)
        ));
    }
    notices
}
