use super::input::FilerInput;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("File is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),
    #[error("Expected a JSON object at the top level")]
    NotAnObject,
    #[error("Unusable value in prior-year record: {0}")]
    Malformed(serde_json::Error),
}

/// A prior-year record laid over a blank draft
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub input: FilerInput,
    /// Keys that are not filer input fields
    pub discarded: Vec<String>,
}

/// Parse an exported record, either bare or wrapped in a save envelope.
///
/// Fields missing from the file take their blank defaults, so nothing from the
/// current draft survives an import.
pub fn import_prior_year(text: &str) -> Result<ImportOutcome, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(ImportError::InvalidJson)?;
    let Value::Object(mut record) = value else {
        return Err(ImportError::NotAnObject);
    };

    let record = match record.remove("data") {
        Some(Value::Object(data)) => {
            log::debug!("Import file is a save envelope");
            data
        }
        Some(other) => {
            record.insert("data".to_string(), other);
            record
        }
        None => record,
    };

    let (known, discarded) = split_known(record);
    if !discarded.is_empty() {
        log::warn!("Discarding unknown import keys: {}", discarded.join(", "));
    }

    let input: FilerInput =
        serde_json::from_value(Value::Object(known)).map_err(ImportError::Malformed)?;
    log::info!(
        "Imported prior-year record ({} keys discarded)",
        discarded.len()
    );
    Ok(ImportOutcome { input, discarded })
}

fn split_known(record: Map<String, Value>) -> (Map<String, Value>, Vec<String>) {
    let mut known = Map::new();
    let mut discarded = Vec::new();
    for (key, value) in record {
        if FilerInput::field(&key).is_some() {
            known.insert(key, value);
        } else {
            discarded.push(key);
        }
    }
    (known, discarded)
}
