//! Year-specific federal tax parameters.
//!
//! A [`RateTable`] is plain data. Its bracket sequences must be validated with
//! [`RateTable::validate`] before they reach the calculators: the bracket math
//! assumes ascending, contiguous, non-overlapping ranges and does not re-check.

use super::filing::FilingStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("{year}: no ordinary brackets for {status}")]
    EmptyBrackets { year: String, status: FilingStatus },
    #[error("{year}: first {status} bracket starts at {min}, expected 0")]
    BracketsNotFromZero {
        year: String,
        status: FilingStatus,
        min: Decimal,
    },
    #[error("{year}: {status} bracket {index} does not start where the previous one ends")]
    BracketGap {
        year: String,
        status: FilingStatus,
        index: usize,
    },
    #[error("{year}: {status} schedule {index} has an upper bound at or below its start")]
    NotAscending {
        year: String,
        status: FilingStatus,
        index: usize,
    },
    #[error("{year}: only the last {status} schedule entry may be unbounded")]
    UnboundedTier { year: String, status: FilingStatus },
    #[error("{year}: last {status} schedule entry must be unbounded")]
    BoundedTop { year: String, status: FilingStatus },
    #[error("{year}: rate {rate} outside [0, 1]")]
    RateOutOfRange { year: String, rate: Decimal },
    #[error("{year}: no preferential tiers for {status}")]
    EmptyTiers { year: String, status: FilingStatus },
    #[error("{year}: {status} has brackets but no {missing}")]
    MissingStatusEntry {
        year: String,
        status: FilingStatus,
        missing: &'static str,
    },
    #[error("{year}: single filer schedule is required")]
    MissingSingle { year: String },
}

/// Ordinary income bracket; `max = None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

/// Capital gains tier; `max` is a threshold on total taxable income, not a width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferentialTier {
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmtParams {
    pub exemption: Decimal,
    pub phaseout_start: Decimal,
    /// Top of the 26% AMT band
    #[serde(rename = "rate26Max")]
    pub rate_26_max: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionLimits {
    pub student_loan_interest_cap: Decimal,
    pub traditional_ira_cap: Decimal,
    pub salt_cap: Decimal,
    /// Share of AGI below which medical expenses are not deductible
    pub medical_floor_rate: Decimal,
    /// Share of AGI that caps charitable gifts
    pub charitable_cash_ceiling_rate: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditAmounts {
    pub child_tax_credit_per_child: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceThresholds {
    /// FinCEN 114, inclusive
    pub fbar_threshold: Decimal,
    /// Form 8938 year-end threshold for single filers, exclusive
    pub fatca_threshold_single: Decimal,
    /// Form 3520 foreign gift threshold, exclusive
    pub foreign_gift_threshold: Decimal,
    /// Per-donor annual gift tax exclusion, exclusive
    pub annual_gift_exclusion: Decimal,
}

/// All numeric parameters for one tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub year: String,
    pub standard_deduction: BTreeMap<FilingStatus, Decimal>,
    pub ordinary_brackets: BTreeMap<FilingStatus, Vec<Bracket>>,
    pub preferential_tiers: BTreeMap<FilingStatus, Vec<PreferentialTier>>,
    pub amt_params: BTreeMap<FilingStatus, AmtParams>,
    pub deduction_limits: DeductionLimits,
    pub credit_amounts: CreditAmounts,
    pub compliance_thresholds: ComplianceThresholds,
}

/// The per-status slice of a rate table used by one calculation
#[derive(Debug, Clone, Copy)]
pub struct StatusRates<'a> {
    /// Status the schedules were actually taken from
    pub status: FilingStatus,
    pub standard_deduction: Decimal,
    pub brackets: &'a [Bracket],
    pub tiers: &'a [PreferentialTier],
    pub amt: &'a AmtParams,
}

impl RateTable {
    /// Resolve the schedules for a filing status.
    ///
    /// Unrecognized statuses (`None`) use the single filer schedules with no
    /// standard deduction. Returns `None` only for a table that fails
    /// [`RateTable::validate`].
    pub fn resolve(&self, status: Option<FilingStatus>) -> Option<StatusRates<'_>> {
        let standard_deduction = status
            .and_then(|s| self.standard_deduction.get(&s).copied())
            .unwrap_or(Decimal::ZERO);

        let schedule_status = status
            .filter(|s| self.ordinary_brackets.contains_key(s))
            .unwrap_or(FilingStatus::Single);
        if status != Some(schedule_status) {
            log::warn!(
                "{}: no schedule for filing status {:?}, using single filer brackets",
                self.year,
                status
            );
        }

        Some(StatusRates {
            status: schedule_status,
            standard_deduction,
            brackets: self.ordinary_brackets.get(&schedule_status)?,
            tiers: self.preferential_tiers.get(&schedule_status)?,
            amt: self.amt_params.get(&schedule_status)?,
        })
    }

    /// Check the invariants the bracket calculators rely on
    pub fn validate(&self) -> Result<(), RateTableError> {
        let year = || self.year.clone();

        if !self.ordinary_brackets.contains_key(&FilingStatus::Single) {
            return Err(RateTableError::MissingSingle { year: year() });
        }

        for (status, brackets) in &self.ordinary_brackets {
            let status = *status;
            self.validate_brackets(status, brackets)?;

            if !self.standard_deduction.contains_key(&status) {
                return Err(RateTableError::MissingStatusEntry {
                    year: year(),
                    status,
                    missing: "standard deduction",
                });
            }
            if !self.amt_params.contains_key(&status) {
                return Err(RateTableError::MissingStatusEntry {
                    year: year(),
                    status,
                    missing: "AMT parameters",
                });
            }
            match self.preferential_tiers.get(&status) {
                Some(tiers) => self.validate_tiers(status, tiers)?,
                None => {
                    return Err(RateTableError::MissingStatusEntry {
                        year: year(),
                        status,
                        missing: "preferential tiers",
                    })
                }
            }
        }

        let limits = &self.deduction_limits;
        for rate in [limits.medical_floor_rate, limits.charitable_cash_ceiling_rate] {
            check_rate(&self.year, rate)?;
        }

        Ok(())
    }

    fn validate_brackets(
        &self,
        status: FilingStatus,
        brackets: &[Bracket],
    ) -> Result<(), RateTableError> {
        let year = || self.year.clone();
        let first = brackets
            .first()
            .ok_or_else(|| RateTableError::EmptyBrackets { year: year(), status })?;
        if !first.min.is_zero() {
            return Err(RateTableError::BracketsNotFromZero {
                year: year(),
                status,
                min: first.min,
            });
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            check_rate(&self.year, bracket.rate)?;
            if index > 0 && brackets[index - 1].max != Some(bracket.min) {
                return Err(RateTableError::BracketGap {
                    year: year(),
                    status,
                    index,
                });
            }
            match bracket.max {
                Some(max) if max <= bracket.min => {
                    return Err(RateTableError::NotAscending {
                        year: year(),
                        status,
                        index,
                    })
                }
                Some(_) if index == last_index => {
                    return Err(RateTableError::BoundedTop { year: year(), status })
                }
                None if index != last_index => {
                    return Err(RateTableError::UnboundedTier { year: year(), status })
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_tiers(
        &self,
        status: FilingStatus,
        tiers: &[PreferentialTier],
    ) -> Result<(), RateTableError> {
        let year = || self.year.clone();
        if tiers.is_empty() {
            return Err(RateTableError::EmptyTiers { year: year(), status });
        }

        let last_index = tiers.len() - 1;
        let mut previous = Decimal::ZERO;
        for (index, tier) in tiers.iter().enumerate() {
            check_rate(&self.year, tier.rate)?;
            match tier.max {
                Some(max) if max <= previous && index > 0 => {
                    return Err(RateTableError::NotAscending {
                        year: year(),
                        status,
                        index,
                    })
                }
                Some(_) if index == last_index => {
                    return Err(RateTableError::BoundedTop { year: year(), status })
                }
                Some(max) => previous = max,
                None if index != last_index => {
                    return Err(RateTableError::UnboundedTier { year: year(), status })
                }
                None => {}
            }
        }
        Ok(())
    }
}

fn check_rate(year: &str, rate: Decimal) -> Result<(), RateTableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(RateTableError::RateOutOfRange {
            year: year.to_string(),
            rate,
        });
    }
    Ok(())
}
