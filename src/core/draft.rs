//! In-progress return drafts and their on-disk store.
//!
//! A [`Draft`] is plain caller-owned state: the filer input, the wizard step
//! and the selected year. [`DraftStore`] loads it once at start-up and writes it
//! back whenever its contents change.

use super::input::FilerInput;
use super::years::DEFAULT_YEAR;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Personal,
    W2,
    Income,
    Retirement,
    Deductions,
    Credits,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Personal,
        WizardStep::W2,
        WizardStep::Income,
        WizardStep::Retirement,
        WizardStep::Deductions,
        WizardStep::Credits,
        WizardStep::Review,
    ];

    pub const LAST: usize = Self::ALL.len() - 1;

    /// Step at `index`, clamped to the last step
    pub fn from_index(index: usize) -> WizardStep {
        Self::ALL[index.min(Self::LAST)]
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Personal => "Personal Info",
            WizardStep::W2 => "W-2 & Withholding",
            WizardStep::Income => "Other Income",
            WizardStep::Retirement => "Retirement",
            WizardStep::Deductions => "Deductions",
            WizardStep::Credits => "Credits & Gifts",
            WizardStep::Review => "Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::Personal => "Your basic information",
            WizardStep::W2 => "Wages and tax withheld",
            WizardStep::Income => "Interest, dividends, business, foreign",
            WizardStep::Retirement => "IRA, 401(k), pensions",
            WizardStep::Deductions => "Itemized or standard",
            WizardStep::Credits => "Credits, gifts, foreign assets",
            WizardStep::Review => "Summary and refund",
        }
    }
}

/// Caller-held draft state, persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub data: FilerInput,
    pub step: usize,
    pub year: String,
    /// When the draft was last written to disk
    pub saved: Option<DateTime<Utc>>,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            data: FilerInput::default(),
            step: 0,
            year: DEFAULT_YEAR.to_string(),
            saved: None,
        }
    }
}

/// The part of a draft that decides whether it needs saving
#[derive(Serialize)]
struct Snapshot<'a> {
    data: &'a FilerInput,
    step: usize,
    year: &'a str,
}

impl Draft {
    pub fn current_step(&self) -> WizardStep {
        WizardStep::from_index(self.step)
    }

    /// Identity and filing status gate the first step; every other step is open
    pub fn can_proceed(&self) -> bool {
        match self.current_step() {
            WizardStep::Personal => {
                let d = &self.data;
                [&d.first_name, &d.last_name, &d.ssn, &d.filing_status]
                    .iter()
                    .all(|s| !s.trim().is_empty())
            }
            _ => true,
        }
    }

    /// Move to the next step. Returns false when blocked or already on review.
    pub fn advance(&mut self) -> bool {
        if self.step >= WizardStep::LAST || !self.can_proceed() {
            return false;
        }
        self.step += 1;
        true
    }

    pub fn back(&mut self) -> bool {
        if self.step == 0 {
            return false;
        }
        self.step = self.step.min(WizardStep::LAST) - 1;
        true
    }

    /// Hex SHA-256 of the draft contents, excluding the save timestamp
    pub fn fingerprint(&self) -> Result<String, DraftError> {
        let snapshot = Snapshot {
            data: &self.data,
            step: self.step,
            year: &self.year,
        };
        let bytes = serde_json::to_vec(&snapshot)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Failed to write draft: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk envelope
#[derive(Serialize, Deserialize)]
struct StoredDraft {
    #[serde(flatten)]
    draft: Draft,
    #[serde(default)]
    fingerprint: Option<String>,
}

/// JSON file holding one draft
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DraftStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved draft, or a fresh one when there is nothing usable on disk
    pub fn load(&self) -> Draft {
        match self.read() {
            Ok(Some(stored)) => {
                let mut draft = stored.draft;
                if draft.step > WizardStep::LAST {
                    log::warn!(
                        "Draft step {} out of range, resuming at review",
                        draft.step
                    );
                    draft.step = WizardStep::LAST;
                }
                draft
            }
            Ok(None) => {
                log::debug!("No draft at {}, starting fresh", self.path.display());
                Draft::default()
            }
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable draft {}: {}",
                    self.path.display(),
                    err
                );
                Draft::default()
            }
        }
    }

    /// Write the draft if it differs from what is stored.
    ///
    /// Stamps `saved` on write and returns whether anything was written.
    pub fn save(&self, draft: &mut Draft) -> Result<bool, DraftError> {
        let fingerprint = draft.fingerprint()?;
        let stored = self.read().ok().flatten().and_then(|s| s.fingerprint);
        if stored.as_deref() == Some(fingerprint.as_str()) {
            log::debug!("Draft unchanged, not saving");
            return Ok(false);
        }

        draft.saved = Some(Utc::now());
        let envelope = StoredDraft {
            draft: draft.clone(),
            fingerprint: Some(fingerprint),
        };
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &envelope)?;
        writer.flush()?;
        log::info!("Saved draft to {}", self.path.display());
        Ok(true)
    }

    fn read(&self) -> anyhow::Result<Option<StoredDraft>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        let stored = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(stored))
    }
}
