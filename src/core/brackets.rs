//! Bracket math shared by the regular tax computation.
//!
//! Both calculators expect schedules that passed [`RateTable::validate`]:
//! ascending, contiguous and non-overlapping, with only the last entry
//! unbounded. Feeding an unsorted schedule is a configuration bug and the
//! result is unspecified.
//!
//! [`RateTable::validate`]: super::rates::RateTable::validate

use super::rates::{Bracket, PreferentialTier};
use rust_decimal::Decimal;

/// Tax on ordinary income across progressive brackets.
///
/// Sums `rate * (min(income, max) - min)` for every bracket that starts below
/// `income`, stopping at the first bracket whose `min` is at or above it.
pub fn progressive_tax(income: Decimal, brackets: &[Bracket]) -> Decimal {
    let mut tax = Decimal::ZERO;
    for bracket in brackets {
        if income <= bracket.min {
            break;
        }
        let top = bracket.max.map_or(income, |max| income.min(max));
        tax += (top - bracket.min) * bracket.rate;
    }
    tax
}

/// Tax on qualified dividends and long-term gains using the stacking method.
///
/// Preferential income sits on top of `ordinary_income` in the taxable income
/// ladder, so it fills tiers starting from wherever ordinary income ends. Tier
/// maxima are thresholds on total taxable income.
pub fn preferential_tax(
    ordinary_income: Decimal,
    preferential_income: Decimal,
    tiers: &[PreferentialTier],
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut remaining = preferential_income;
    let mut cursor = ordinary_income;

    for tier in tiers {
        if remaining <= Decimal::ZERO {
            break;
        }
        let space_in_tier = match tier.max {
            Some(max) => (max - cursor).max(Decimal::ZERO),
            None => remaining,
        };
        let taxable_here = remaining.min(space_in_tier);
        tax += taxable_here * tier.rate;
        remaining -= taxable_here;
        cursor += taxable_here;
    }
    tax
}

/// Convert cumulative tiers into `{min, max, rate}` segments
pub fn tiers_as_brackets(tiers: &[PreferentialTier]) -> Vec<Bracket> {
    let mut min = Decimal::ZERO;
    tiers
        .iter()
        .map(|tier| {
            let bracket = Bracket {
                min,
                max: tier.max,
                rate: tier.rate,
            };
            if let Some(max) = tier.max {
                min = max;
            }
            bracket
        })
        .collect()
}
