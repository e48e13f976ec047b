//! Federal income tax estimate for one filer and one tax year.
//!
//! [`calculate`] runs the whole pipeline on every call: income, adjustments,
//! deductions, regular tax, AMT, self-employment tax, credits, payments and
//! compliance flags. It reads its inputs, allocates a fresh [`TaxResult`], and
//! has no other effects.

use super::brackets::{preferential_tax, progressive_tax};
use super::input::FilerInput;
use super::rates::RateTable;
use super::years::RateTableSource;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Share of net earnings subject to self-employment tax
const SE_EARNINGS_FACTOR: Decimal = dec!(0.9235);
/// Social security + medicare rate on self-employment earnings
const SE_TAX_RATE: Decimal = dec!(0.153);
/// Employer-equivalent half, deductible above the line
const SE_HALF_RATE: Decimal = dec!(0.0765);

const AMT_LOW_RATE: Decimal = dec!(0.26);
const AMT_HIGH_RATE: Decimal = dec!(0.28);
/// Exemption reduction per dollar of AMT income above the phase-out start
const AMT_PHASEOUT_RATE: Decimal = dec!(0.25);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxResult {
    pub income: IncomeSummary,
    pub adjustments: Adjustments,
    pub agi: Decimal,
    pub deductions: Deductions,
    pub taxable_income: Decimal,
    pub ordinary_income: Decimal,
    pub preferential_income: Decimal,
    pub ordinary_tax: Decimal,
    pub preferential_tax: Decimal,
    pub regular_tax: Decimal,
    pub amt: AmtBreakdown,
    /// Excess of tentative AMT over regular tax
    pub amt_owed: Decimal,
    pub income_tax: Decimal,
    pub self_employment_tax: Decimal,
    pub credits: Credits,
    pub tax_after_credits: Decimal,
    pub total_tax: Decimal,
    pub payments: Payments,
    /// Positive is a refund, negative is an amount owed
    pub refund_or_owed: Decimal,
    pub flags: ComplianceFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeSummary {
    pub wages: Decimal,
    pub domestic_interest: Decimal,
    pub domestic_dividends: Decimal,
    /// Clamped to the ordinary dividend total
    pub qualified_dividends: Decimal,
    pub long_term_capital_gains: Decimal,
    pub foreign_interest: Decimal,
    pub foreign_dividends: Decimal,
    pub business_net: Decimal,
    pub pension_taxable: Decimal,
    pub misc_total: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Adjustments {
    pub student_loan_interest: Decimal,
    pub traditional_ira: Decimal,
    pub hsa: Decimal,
    pub half_self_employment_tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionKind {
    Standard,
    Itemized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemizedDeductions {
    pub medical: Decimal,
    pub salt: Decimal,
    pub mortgage: Decimal,
    pub charitable: Decimal,
    pub other: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deductions {
    pub standard: Decimal,
    pub itemized: ItemizedDeductions,
    pub used: Decimal,
    pub kind: DeductionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmtBreakdown {
    /// AGI plus the SALT deduction add-back
    pub income: Decimal,
    /// Exemption after phase-out
    pub exemption: Decimal,
    pub taxable: Decimal,
    /// Tentative minimum tax
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credits {
    pub child_tax_credit: Decimal,
    pub education: Decimal,
    pub foreign_tax: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payments {
    pub federal_withheld: Decimal,
    pub misc_withheld: Decimal,
    pub estimated_payments: Decimal,
    /// Federal payments only
    pub total: Decimal,
    /// Tracked for the state return; never counted as a federal payment
    pub state_tax_withheld: Decimal,
}

/// Separate filings the filer may need; informational only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceFlags {
    /// FinCEN 114 (FBAR)
    pub fbar: bool,
    /// Form 8938, always against the single filer threshold
    pub fatca: bool,
    /// Form 3520, gift from a foreign person above the threshold
    pub foreign_gift: bool,
    /// A single gift above the annual exclusion; the donor may owe a Form 709
    pub donor_gift_return: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Refund(Decimal),
    Owed(Decimal),
    Even,
}

impl TaxResult {
    pub fn uses_itemized(&self) -> bool {
        self.deductions.kind == DeductionKind::Itemized
    }

    pub fn settlement(&self) -> Settlement {
        if self.refund_or_owed > Decimal::ZERO {
            Settlement::Refund(self.refund_or_owed)
        } else if self.refund_or_owed < Decimal::ZERO {
            Settlement::Owed(-self.refund_or_owed)
        } else {
            Settlement::Even
        }
    }
}

/// Estimate tax for the rate table of the selected year.
///
/// `None` means "not ready": the year has no rate table or no filing status
/// has been chosen yet.
pub fn calculate_for_year<S: RateTableSource + ?Sized>(
    input: &FilerInput,
    source: &S,
    year: &str,
) -> Option<TaxResult> {
    let Some(table) = source.rate_table(year) else {
        log::debug!("No rate table for year {}", year);
        return None;
    };
    calculate(input, table)
}

/// Estimate tax for one filer against one validated rate table.
///
/// Returns `None` while the filing status is blank.
pub fn calculate(input: &FilerInput, table: &RateTable) -> Option<TaxResult> {
    if !input.has_filing_status() {
        log::debug!("Filing status not chosen, nothing to calculate");
        return None;
    }
    let rates = table.resolve(input.status())?;
    log::debug!("{}: using {} schedules", table.year, rates.status);
    let limits = &table.deduction_limits;
    let zero = Decimal::ZERO;

    // Income
    let domestic_dividends = input.domestic_dividends.value();
    let business_net =
        (input.business_income.value() - input.business_expenses.value()).max(zero);
    let income = {
        let wages = input.w2_wages.value();
        let domestic_interest = input.domestic_interest.value();
        let qualified_dividends = input.qualified_dividends.value().min(domestic_dividends);
        let long_term_capital_gains = input.long_term_capital_gains.value();
        let foreign_interest = input.foreign_interest.value();
        let foreign_dividends = input.foreign_dividends.value();
        let pension_taxable = input.pension_taxable.value();
        let misc_total: Decimal = input.misc_incomes.iter().map(|m| m.amount.value()).sum();

        // ordinary dividends already contain the qualified subset
        let total = wages
            + domestic_interest
            + domestic_dividends
            + long_term_capital_gains
            + foreign_interest
            + foreign_dividends
            + business_net
            + pension_taxable
            + misc_total;

        IncomeSummary {
            wages,
            domestic_interest,
            domestic_dividends,
            qualified_dividends,
            long_term_capital_gains,
            foreign_interest,
            foreign_dividends,
            business_net,
            pension_taxable,
            misc_total,
            total,
        }
    };
    log::debug!("Total income {}", income.total);

    // Above-the-line adjustments
    let adjustments = {
        let student_loan_interest = input
            .student_loan_interest
            .value()
            .min(limits.student_loan_interest_cap);
        let traditional_ira = input
            .traditional_ira_contribution
            .value()
            .min(limits.traditional_ira_cap);
        let hsa = input.hsa_self_contribution.value();
        let half_self_employment_tax = self_employment_share(business_net, SE_HALF_RATE);
        Adjustments {
            student_loan_interest,
            traditional_ira,
            hsa,
            half_self_employment_tax,
            total: student_loan_interest + traditional_ira + hsa + half_self_employment_tax,
        }
    };
    let agi = (income.total - adjustments.total).max(zero);
    log::debug!("Adjustments {}, AGI {}", adjustments.total, agi);

    // Standard vs itemized
    let deductions = {
        let salt = (input.state_income_tax.value() + input.local_property_tax.value())
            .min(limits.salt_cap);
        let medical = (input.medical_expenses.value() - agi * limits.medical_floor_rate).max(zero);
        let mortgage = input.mortgage_interest.value() + input.mortgage_points.value();
        let charitable = (input.charitable_cash.value() + input.charitable_non_cash.value())
            .min(agi * limits.charitable_cash_ceiling_rate);
        let other = input.other_itemized.value();
        let itemized = ItemizedDeductions {
            medical,
            salt,
            mortgage,
            charitable,
            other,
            total: medical + salt + mortgage + charitable + other,
        };

        let standard = rates.standard_deduction;
        let kind = if itemized.total > standard {
            DeductionKind::Itemized
        } else {
            DeductionKind::Standard
        };
        Deductions {
            standard,
            used: standard.max(itemized.total),
            itemized,
            kind,
        }
    };
    let taxable_income = (agi - deductions.used).max(zero);
    log::debug!(
        "Deduction {:?} {}, taxable income {}",
        deductions.kind,
        deductions.used,
        taxable_income
    );

    // Regular tax with preferential income stacked on top
    let preferential_income =
        (income.qualified_dividends + income.long_term_capital_gains).min(taxable_income);
    let ordinary_income = taxable_income - preferential_income;
    let ordinary_tax = progressive_tax(ordinary_income, rates.brackets);
    let preferential = preferential_tax(ordinary_income, preferential_income, rates.tiers);
    let regular_tax = ordinary_tax + preferential;
    log::debug!(
        "Ordinary tax {} on {}, preferential tax {} on {}",
        ordinary_tax,
        ordinary_income,
        preferential,
        preferential_income
    );

    // Simplified AMT: SALT is the only add-back
    let amt = {
        let amt_income = agi + deductions.itemized.salt;
        let phaseout = (amt_income - rates.amt.phaseout_start).max(zero) * AMT_PHASEOUT_RATE;
        let exemption = (rates.amt.exemption - phaseout).max(zero);
        let taxable = (amt_income - exemption).max(zero);
        let tax = taxable.min(rates.amt.rate_26_max) * AMT_LOW_RATE
            + (taxable - rates.amt.rate_26_max).max(zero) * AMT_HIGH_RATE;
        AmtBreakdown {
            income: amt_income,
            exemption,
            taxable,
            tax,
        }
    };
    let amt_owed = (amt.tax - regular_tax).max(zero);
    let income_tax = regular_tax + amt_owed;
    log::debug!("Tentative AMT {}, AMT owed {}", amt.tax, amt_owed);

    let self_employment_tax = self_employment_share(business_net, SE_TAX_RATE);

    // Credits never push income tax below zero and never touch SE tax
    let credits = {
        let child_tax_credit = if input.child_tax_credit {
            Decimal::from(input.dependents) * table.credit_amounts.child_tax_credit_per_child
        } else {
            zero
        };
        let education = input.education_credit.value();
        let foreign_tax = input.foreign_tax_credit.value();
        Credits {
            child_tax_credit,
            education,
            foreign_tax,
            total: child_tax_credit + education + foreign_tax,
        }
    };
    let tax_after_credits = (income_tax - credits.total).max(zero);
    let total_tax = tax_after_credits + self_employment_tax;

    let payments = {
        let federal_withheld = input.w2_federal_tax.value();
        let misc_withheld: Decimal = input.misc_incomes.iter().map(|m| m.withheld.value()).sum();
        let estimated_payments = input.estimated_tax_payments.value();
        Payments {
            federal_withheld,
            misc_withheld,
            estimated_payments,
            total: federal_withheld + misc_withheld + estimated_payments,
            state_tax_withheld: input.w2_state_tax.value(),
        }
    };
    let refund_or_owed = payments.total - total_tax;
    log::debug!(
        "Total tax {}, payments {}, refund/owed {}",
        total_tax,
        payments.total,
        refund_or_owed
    );

    let flags = compliance_flags(input, table);

    Some(TaxResult {
        income,
        adjustments,
        agi,
        deductions,
        taxable_income,
        ordinary_income,
        preferential_income,
        ordinary_tax,
        preferential_tax: preferential,
        regular_tax,
        amt,
        amt_owed,
        income_tax,
        self_employment_tax,
        credits,
        tax_after_credits,
        total_tax,
        payments,
        refund_or_owed,
        flags,
    })
}

fn self_employment_share(business_net: Decimal, rate: Decimal) -> Decimal {
    if business_net <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (business_net * SE_EARNINGS_FACTOR * rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn compliance_flags(input: &FilerInput, table: &RateTable) -> ComplianceFlags {
    let thresholds = &table.compliance_thresholds;

    // FATCA deliberately ignores filing status and uses the single threshold
    let fatca = input.has_foreign_assets
        && input.foreign_assets_value.value() > thresholds.fatca_threshold_single;

    ComplianceFlags {
        fbar: input.foreign_bank_max_balance.value() >= thresholds.fbar_threshold,
        fatca,
        foreign_gift: input
            .gifts_received
            .iter()
            .any(|g| g.is_from_foreigner && g.amount.value() > thresholds.foreign_gift_threshold),
        donor_gift_return: input
            .gifts_received
            .iter()
            .any(|g| g.amount.value() > thresholds.annual_gift_exclusion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::{Amount, MAX_AMOUNT};
    use crate::core::FilingStatus;
    use crate::core::input::{GiftReceived, MiscIncome};
    use crate::core::years::RateTables;
    use proptest::prelude::*;

    fn tables() -> RateTables {
        RateTables::builtin()
    }

    fn filer(status: &str) -> FilerInput {
        FilerInput {
            filing_status: status.to_string(),
            ..Default::default()
        }
    }

    fn run(input: &FilerInput) -> TaxResult {
        calculate_for_year(input, &tables(), "2024").expect("ready to calculate")
    }

    #[test]
    fn not_ready_without_filing_status() {
        let input = FilerInput {
            w2_wages: Amount::new("60000"),
            ..Default::default()
        };
        assert_eq!(calculate_for_year(&input, &tables(), "2024"), None);
    }

    #[test]
    fn not_ready_without_rate_table() {
        assert_eq!(calculate_for_year(&filer("single"), &tables(), "1999"), None);
    }

    #[test]
    fn single_wage_earner_gets_refund() {
        let input = FilerInput {
            w2_wages: Amount::new("60000"),
            w2_federal_tax: Amount::new("6000"),
            ..filer("single")
        };
        let result = run(&input);

        assert_eq!(result.agi, dec!(60000));
        assert_eq!(result.deductions.kind, DeductionKind::Standard);
        assert_eq!(result.taxable_income, dec!(45400));
        assert_eq!(result.ordinary_tax, dec!(5216));
        assert_eq!(result.preferential_tax, dec!(0));
        assert_eq!(result.amt_owed, dec!(0));
        assert_eq!(result.total_tax, dec!(5216));
        assert_eq!(result.refund_or_owed, dec!(784));
        assert_eq!(result.settlement(), Settlement::Refund(dec!(784)));
    }

    #[test]
    fn married_joint_qualified_dividends_in_zero_tier() {
        let input = FilerInput {
            domestic_dividends: Amount::new("50000"),
            qualified_dividends: Amount::new("50000"),
            ..filer("married-joint")
        };
        let result = run(&input);

        assert_eq!(result.taxable_income, dec!(20800));
        assert_eq!(result.preferential_income, dec!(20800));
        assert_eq!(result.ordinary_income, dec!(0));
        assert_eq!(result.preferential_tax, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.settlement(), Settlement::Even);
    }

    #[test]
    fn self_employment_tax_and_half_adjustment() {
        let input = FilerInput {
            business_income: Amount::new("100000"),
            business_expenses: Amount::new("20000"),
            ..filer("single")
        };
        let result = run(&input);

        assert_eq!(result.income.business_net, dec!(80000));
        // 80000 * 0.9235 * 0.153 = 11303.64
        assert_eq!(result.self_employment_tax, dec!(11304));
        assert_eq!(result.adjustments.half_self_employment_tax, dec!(5652));
        assert_eq!(result.agi, dec!(74348));
        assert_eq!(result.total_tax, result.tax_after_credits + dec!(11304));
    }

    #[test]
    fn business_loss_contributes_nothing() {
        let input = FilerInput {
            w2_wages: Amount::new("30000"),
            business_income: Amount::new("5000"),
            business_expenses: Amount::new("9000"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.income.business_net, dec!(0));
        assert_eq!(result.income.total, dec!(30000));
        assert_eq!(result.self_employment_tax, dec!(0));
    }

    #[test]
    fn salt_capped_for_itemizing_and_amt() {
        let input = FilerInput {
            w2_wages: Amount::new("150000"),
            state_income_tax: Amount::new("9000"),
            local_property_tax: Amount::new("6000"),
            mortgage_interest: Amount::new("12000"),
            ..filer("single")
        };
        let result = run(&input);

        assert_eq!(result.deductions.itemized.salt, dec!(10000));
        assert_eq!(result.deductions.itemized.total, dec!(22000));
        assert!(result.uses_itemized());
        assert_eq!(result.amt.income, dec!(160000));
    }

    #[test]
    fn fbar_threshold_is_inclusive() {
        let mut input = FilerInput {
            foreign_bank_max_balance: Amount::new("12000"),
            ..filer("single")
        };
        assert!(run(&input).flags.fbar);

        input.foreign_bank_max_balance = Amount::new("10000");
        assert!(run(&input).flags.fbar);

        input.foreign_bank_max_balance = Amount::new("9999.99");
        assert!(!run(&input).flags.fbar);
    }

    #[test]
    fn fatca_uses_single_threshold_for_every_status() {
        // married filers face a higher real threshold; the estimate keeps the single one
        let input = FilerInput {
            has_foreign_assets: true,
            foreign_assets_value: Amount::new("60000"),
            ..filer("married-joint")
        };
        assert!(run(&input).flags.fatca);

        let at_threshold = FilerInput {
            foreign_assets_value: Amount::new("50000"),
            ..input.clone()
        };
        assert!(!run(&at_threshold).flags.fatca);

        let undeclared = FilerInput {
            has_foreign_assets: false,
            ..input
        };
        assert!(!run(&undeclared).flags.fatca);
    }

    #[test]
    fn foreign_gift_over_threshold_flagged() {
        let input = FilerInput {
            gifts_received: vec![
                GiftReceived {
                    from: "Domestic aunt".to_string(),
                    amount: Amount::new("150000"),
                    is_from_foreigner: false,
                },
                GiftReceived {
                    from: "Foreign uncle".to_string(),
                    amount: Amount::new("100000"),
                    is_from_foreigner: true,
                },
            ],
            ..filer("single")
        };
        let flags = run(&input).flags;
        assert!(!flags.foreign_gift);
        assert!(flags.donor_gift_return);

        let mut over = input.clone();
        over.gifts_received[1].amount = Amount::new("100001");
        assert!(run(&over).flags.foreign_gift);
    }

    #[test]
    fn donor_gift_return_above_annual_exclusion_only() {
        let gift = |amount: &str| FilerInput {
            gifts_received: vec![GiftReceived {
                from: "Parent".to_string(),
                amount: Amount::new(amount),
                is_from_foreigner: false,
            }],
            ..filer("single")
        };
        assert!(!run(&gift("18000")).flags.donor_gift_return);
        assert!(run(&gift("18000.01")).flags.donor_gift_return);

        let result = calculate_for_year(&gift("18500"), &tables(), "2025").expect("ready");
        assert!(!result.flags.donor_gift_return);
    }

    #[test]
    fn qualified_dividends_clamped_to_ordinary_dividends() {
        let input = FilerInput {
            domestic_dividends: Amount::new("1000"),
            qualified_dividends: Amount::new("5000"),
            w2_wages: Amount::new("50000"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.income.qualified_dividends, dec!(1000));
        assert_eq!(result.income.total, dec!(51000));
        assert_eq!(result.preferential_income, dec!(1000));
    }

    #[test]
    fn ties_use_standard_deduction() {
        let input = FilerInput {
            w2_wages: Amount::new("80000"),
            mortgage_interest: Amount::new("14600"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.deductions.itemized.total, dec!(14600));
        assert_eq!(result.deductions.kind, DeductionKind::Standard);
        assert_eq!(result.deductions.used, dec!(14600));
    }

    #[test]
    fn medical_floor_and_charitable_ceiling() {
        let input = FilerInput {
            w2_wages: Amount::new("40000"),
            medical_expenses: Amount::new("5000"),
            charitable_cash: Amount::new("20000"),
            charitable_non_cash: Amount::new("10000"),
            ..filer("single")
        };
        let result = run(&input);
        // 7.5% of 40000 = 3000 floor
        assert_eq!(result.deductions.itemized.medical, dec!(2000));
        // 60% of 40000
        assert_eq!(result.deductions.itemized.charitable, dec!(24000));
    }

    #[test]
    fn adjustments_capped() {
        let input = FilerInput {
            w2_wages: Amount::new("70000"),
            student_loan_interest: Amount::new("4000"),
            traditional_ira_contribution: Amount::new("9000"),
            hsa_self_contribution: Amount::new("3000"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.adjustments.student_loan_interest, dec!(2500));
        assert_eq!(result.adjustments.traditional_ira, dec!(7000));
        assert_eq!(result.adjustments.hsa, dec!(3000));
        assert_eq!(result.agi, dec!(57500));
    }

    #[test]
    fn agi_and_taxable_income_floor_at_zero() {
        let input = FilerInput {
            w2_wages: Amount::new("1000"),
            student_loan_interest: Amount::new("2500"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.agi, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn credits_cannot_make_income_tax_negative() {
        let input = FilerInput {
            w2_wages: Amount::new("30000"),
            dependents: 3,
            child_tax_credit: true,
            education_credit: Amount::new("1000"),
            business_income: Amount::new("10000"),
            ..filer("head-of-household")
        };
        let result = run(&input);
        assert_eq!(result.credits.child_tax_credit, dec!(6000));
        assert_eq!(result.credits.total, dec!(7000));
        assert_eq!(result.tax_after_credits, dec!(0));
        assert_eq!(result.total_tax, result.self_employment_tax);
        assert!(result.self_employment_tax > dec!(0));
    }

    #[test]
    fn child_credit_needs_election() {
        let input = FilerInput {
            w2_wages: Amount::new("90000"),
            dependents: 2,
            ..filer("married-joint")
        };
        assert_eq!(run(&input).credits.child_tax_credit, dec!(0));
    }

    #[test]
    fn state_withholding_excluded_from_payments() {
        let input = FilerInput {
            w2_wages: Amount::new("60000"),
            w2_federal_tax: Amount::new("6000"),
            w2_state_tax: Amount::new("2500"),
            estimated_tax_payments: Amount::new("400"),
            misc_incomes: vec![MiscIncome {
                description: "consulting".to_string(),
                amount: Amount::new("1000"),
                withheld: Amount::new("100"),
            }],
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.payments.state_tax_withheld, dec!(2500));
        assert_eq!(result.payments.total, dec!(6500));
        assert_eq!(result.income.misc_total, dec!(1000));
    }

    #[test]
    fn amount_owed_is_negative() {
        let input = FilerInput {
            w2_wages: Amount::new("60000"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.refund_or_owed, dec!(-5216));
        assert_eq!(result.settlement(), Settlement::Owed(dec!(5216)));
    }

    #[test]
    fn amt_applies_when_salt_add_back_dominates() {
        // large preferential income taxed at 0-15% while AMT taxes it at 26%
        let input = FilerInput {
            long_term_capital_gains: Amount::new("400000"),
            state_income_tax: Amount::new("10000"),
            mortgage_interest: Amount::new("20000"),
            ..filer("single")
        };
        let result = run(&input);
        assert!(result.amt_owed > dec!(0));
        assert_eq!(result.income_tax, result.regular_tax + result.amt_owed);
        assert_eq!(result.income_tax, result.amt.tax);
    }

    #[test]
    fn amt_exemption_phases_out() {
        let input = FilerInput {
            w2_wages: Amount::new("1000000"),
            ..filer("single")
        };
        let result = run(&input);
        // (1000000 - 609350) * 0.25 = 97662.5 > 85700
        assert_eq!(result.amt.exemption, dec!(0));
        assert_eq!(result.amt.taxable, dec!(1000000));
        assert!(result.income_tax >= result.regular_tax);
    }

    #[test]
    fn unrecognized_status_uses_single_schedule_without_standard_deduction() {
        let input = FilerInput {
            w2_wages: Amount::new("20000"),
            ..filer("qualifying-widow")
        };
        let result = run(&input);
        assert_eq!(result.deductions.standard, dec!(0));
        assert_eq!(result.taxable_income, dec!(20000));
        assert_eq!(result.ordinary_tax, dec!(1160) + dec!(8400) * dec!(0.12));
    }

    #[test]
    fn invalid_text_is_zero() {
        let input = FilerInput {
            w2_wages: Amount::new("lots"),
            domestic_interest: Amount::new("-300"),
            ..filer("single")
        };
        let result = run(&input);
        assert_eq!(result.income.total, dec!(0));
    }

    #[test]
    fn huge_amounts_are_clamped() {
        let input = FilerInput {
            w2_wages: Amount::new("50000000000000000000000000000"),
            domestic_interest: Amount::new("50000000000000000000000000000"),
            business_income: Amount::new("123456789012345678901234567890123"),
            w2_federal_tax: Amount::new("99999999999999999999999999999999"),
            ..filer("married-joint")
        };
        let result = run(&input);
        assert_eq!(result.income.wages, MAX_AMOUNT);
        assert_eq!(result.income.domestic_interest, MAX_AMOUNT);
        assert_eq!(result.income.business_net, MAX_AMOUNT);
        assert_eq!(result.income.total, MAX_AMOUNT * dec!(3));
        assert!(result.total_tax > dec!(0));
        assert_eq!(result.payments.federal_withheld, MAX_AMOUNT);
    }

    #[test]
    fn identical_inputs_identical_results() {
        let input = FilerInput {
            w2_wages: Amount::new("123456.78"),
            domestic_dividends: Amount::new("4000"),
            qualified_dividends: Amount::new("3000"),
            business_income: Amount::new("25000"),
            ..filer("married-separate")
        };
        assert_eq!(run(&input), run(&input));
    }

    #[test]
    fn year_changes_result() {
        let input = FilerInput {
            w2_wages: Amount::new("60000"),
            ..filer("single")
        };
        let r2024 = calculate_for_year(&input, &tables(), "2024").unwrap();
        let r2025 = calculate_for_year(&input, &tables(), "2025").unwrap();
        assert_eq!(r2025.taxable_income, dec!(45000));
        assert!(r2025.total_tax < r2024.total_tax);
    }

    fn dollars(cents: u64) -> String {
        format!("{}.{:02}", cents / 100, cents % 100)
    }

    prop_compose! {
        fn any_filer()(
            status in prop::sample::select(FilingStatus::ALL.to_vec()),
            dependents in 0u32..6,
            child_tax_credit in any::<bool>(),
            amounts in prop::collection::vec(0u64..100_000_000, 14),
        ) -> FilerInput {
            FilerInput {
                filing_status: status.key().to_string(),
                dependents,
                child_tax_credit,
                w2_wages: Amount::new(dollars(amounts[0])),
                w2_federal_tax: Amount::new(dollars(amounts[1])),
                domestic_interest: Amount::new(dollars(amounts[2])),
                domestic_dividends: Amount::new(dollars(amounts[3])),
                qualified_dividends: Amount::new(dollars(amounts[4])),
                long_term_capital_gains: Amount::new(dollars(amounts[5])),
                business_income: Amount::new(dollars(amounts[6])),
                business_expenses: Amount::new(dollars(amounts[7])),
                traditional_ira_contribution: Amount::new(dollars(amounts[8])),
                state_income_tax: Amount::new(dollars(amounts[9])),
                local_property_tax: Amount::new(dollars(amounts[10])),
                mortgage_interest: Amount::new(dollars(amounts[11])),
                education_credit: Amount::new(dollars(amounts[12])),
                foreign_tax_credit: Amount::new(dollars(amounts[13])),
                ..Default::default()
            }
        }
    }

    proptest! {
        #[test]
        fn results_stay_within_bounds(input in any_filer()) {
            let result = run(&input);
            prop_assert!(result.agi >= Decimal::ZERO);
            prop_assert!(result.taxable_income >= Decimal::ZERO);
            prop_assert!(result.amt_owed >= Decimal::ZERO);
            prop_assert!(result.income_tax >= result.regular_tax);
            prop_assert!(result.tax_after_credits >= Decimal::ZERO);
            prop_assert!(result.income.qualified_dividends <= result.income.domestic_dividends);
        }
    }
}
