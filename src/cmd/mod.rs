pub mod draft;
pub mod import;
pub mod links;
pub mod rates;
pub mod schema;
pub mod summary;

use crate::core::{FilerInput, RateTables};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Default location of the saved draft
pub const DEFAULT_STORE: &str = "taxflow-draft.json";

/// Read a text file (or stdin with "-")
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        read_from_stdin()
    } else {
        read_from_file(path)
    }
}

fn read_from_file(path: &Path) -> anyhow::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}

fn read_from_stdin() -> anyhow::Result<String> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    if text.trim().is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }
    Ok(text)
}

/// Read a filer input record (JSON) from a file or stdin
pub fn read_input(path: &Path) -> anyhow::Result<FilerInput> {
    let text = read_text(path)?;
    let input = serde_json::from_str(&text)?;
    Ok(input)
}

/// Builtin rate tables, with an optional override file layered on top
pub fn load_rate_tables(overrides: Option<&Path>) -> anyhow::Result<RateTables> {
    let builtin = RateTables::builtin();
    match overrides {
        Some(path) => {
            let file = File::open(path)?;
            let extra = RateTables::from_json_reader(BufReader::new(file))?;
            Ok(builtin.extend_with(extra))
        }
        None => Ok(builtin),
    }
}

pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let text = format!("{:.2}", rounded);
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < Decimal::ZERO && !rounded.is_zero() {
        format!("-${}.{}", grouped, cents)
    } else {
        format!("${}.{}", grouped, cents)
    }
}

pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
