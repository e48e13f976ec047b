use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Federal filing status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ];

    pub fn from_str(s: &str) -> Option<FilingStatus> {
        match s.trim().to_lowercase().as_str() {
            "single" => Some(FilingStatus::Single),
            "married-joint" => Some(FilingStatus::MarriedJoint),
            "married-separate" => Some(FilingStatus::MarriedSeparate),
            "head-of-household" => Some(FilingStatus::HeadOfHousehold),
            _ => None,
        }
    }

    /// Wire key, as stored in drafts and rate table files
    pub fn key(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedJoint => "married-joint",
            FilingStatus::MarriedSeparate => "married-separate",
            FilingStatus::HeadOfHousehold => "head-of-household",
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married Filing Jointly",
            FilingStatus::MarriedSeparate => "Married Filing Separately",
            FilingStatus::HeadOfHousehold => "Head of Household",
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
