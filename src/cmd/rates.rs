//! Rates command - show the parameters of a tax year

use crate::cmd::{format_rate, format_usd, load_rate_tables};
use crate::core::{tiers_as_brackets, Bracket, FilingStatus, RateTable, RateTableSource, DEFAULT_YEAR};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Tax year to show
    #[arg(short, long, default_value = DEFAULT_YEAR)]
    year: String,

    /// Only show schedules for one filing status
    #[arg(short, long, value_enum)]
    status: Option<FilingStatusArg>,

    /// JSON file of extra or replacement rate tables keyed by year
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Output the rate table as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilingStatusArg {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl From<FilingStatusArg> for FilingStatus {
    fn from(arg: FilingStatusArg) -> Self {
        match arg {
            FilingStatusArg::Single => FilingStatus::Single,
            FilingStatusArg::MarriedJoint => FilingStatus::MarriedJoint,
            FilingStatusArg::MarriedSeparate => FilingStatus::MarriedSeparate,
            FilingStatusArg::HeadOfHousehold => FilingStatus::HeadOfHousehold,
        }
    }
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Clone, Tabled)]
struct ParamRow {
    #[tabled(rename = "Parameter")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tables = load_rate_tables(self.rates.as_deref())?;
        let Some(table) = tables.rate_table(&self.year) else {
            anyhow::bail!(
                "No rate table for tax year {} (available: {})",
                self.year,
                tables.years().join(", ")
            );
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(table)?);
            return Ok(());
        }

        let statuses: Vec<FilingStatus> = match self.status {
            Some(arg) => vec![arg.into()],
            None => FilingStatus::ALL.to_vec(),
        };

        println!();
        println!("FEDERAL RATES {}", table.year);
        for status in statuses {
            self.print_status(table, status);
        }
        self.print_shared(table);
        Ok(())
    }

    fn print_status(&self, table: &RateTable, status: FilingStatus) {
        println!();
        println!("{}", status.display().to_uppercase());

        let mut params = Vec::new();
        if let Some(deduction) = table.standard_deduction.get(&status) {
            params.push(param("Standard deduction", format_usd(*deduction)));
        }
        if let Some(amt) = table.amt_params.get(&status) {
            params.push(param("AMT exemption", format_usd(amt.exemption)));
            params.push(param("AMT phase-out start", format_usd(amt.phaseout_start)));
            params.push(param("AMT 26% band top", format_usd(amt.rate_26_max)));
        }
        print_table(params);

        if let Some(brackets) = table.ordinary_brackets.get(&status) {
            println!("Ordinary income");
            print_table(bracket_rows(brackets));
        }
        if let Some(tiers) = table.preferential_tiers.get(&status) {
            println!("Qualified dividends and long-term gains");
            print_table(bracket_rows(&tiers_as_brackets(tiers)));
        }
    }

    fn print_shared(&self, table: &RateTable) {
        let limits = &table.deduction_limits;
        let thresholds = &table.compliance_thresholds;
        let params = vec![
            param("Student loan interest cap", format_usd(limits.student_loan_interest_cap)),
            param("Traditional IRA cap", format_usd(limits.traditional_ira_cap)),
            param("SALT cap", format_usd(limits.salt_cap)),
            param("Medical floor (of AGI)", format_rate(limits.medical_floor_rate)),
            param(
                "Charitable ceiling (of AGI)",
                format_rate(limits.charitable_cash_ceiling_rate),
            ),
            param(
                "Child tax credit per child",
                format_usd(table.credit_amounts.child_tax_credit_per_child),
            ),
            param("FBAR threshold", format_usd(thresholds.fbar_threshold)),
            param("FATCA threshold (single)", format_usd(thresholds.fatca_threshold_single)),
            param("Form 3520 gift threshold", format_usd(thresholds.foreign_gift_threshold)),
            param("Annual gift exclusion", format_usd(thresholds.annual_gift_exclusion)),
        ];
        println!();
        println!("LIMITS AND THRESHOLDS");
        print_table(params);
    }
}

fn param(name: &str, value: String) -> ParamRow {
    ParamRow {
        name: name.to_string(),
        value,
    }
}

fn bracket_rows(brackets: &[Bracket]) -> Vec<BracketRow> {
    brackets
        .iter()
        .map(|b| BracketRow {
            from: format_usd(b.min),
            to: b.max.map_or("and above".to_string(), format_usd),
            rate: format_rate(b.rate),
        })
        .collect()
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}
