use super::amount::{deserialize_count, Amount};
use super::filing::FilingStatus;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use taxflow_derive::InputFields;

/// Describes one field of the filer input record (generated by `#[derive(InputFields)]`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
}

impl InputField {
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}

/// One return draft, as entered by the filer.
///
/// Monetary fields are kept as typed; the engine derives numbers from them and
/// never mutates the record. Unknown keys are ignored on deserialization and
/// missing keys take their blank defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, InputFields)]
#[serde(rename_all = "camelCase", default)]
pub struct FilerInput {
    /// First name (identity only)
    pub first_name: String,
    /// Last name (identity only)
    pub last_name: String,
    /// Social security number (identity only)
    pub ssn: String,
    /// single, married-joint, married-separate or head-of-household
    pub filing_status: String,
    /// Number of qualifying children
    #[serde(deserialize_with = "deserialize_count")]
    #[schemars(with = "u32")]
    pub dependents: u32,

    /// W-2 box 1 wages
    pub w2_wages: Amount,
    /// W-2 box 2 federal income tax withheld
    pub w2_federal_tax: Amount,
    /// W-2 box 16 state income tax withheld (not a federal payment)
    pub w2_state_tax: Amount,
    /// W-2 box 3 social security wages (informational)
    pub w2_social_security: Amount,
    /// W-2 box 5 medicare wages (informational)
    pub w2_medicare: Amount,

    /// Domestic taxable interest
    pub domestic_interest: Amount,
    /// Domestic ordinary dividends (1099-DIV box 1a), includes qualified dividends
    pub domestic_dividends: Amount,
    /// Qualified dividends (1099-DIV box 1b), a subset of ordinary dividends
    pub qualified_dividends: Amount,
    /// Long-term capital gains
    pub long_term_capital_gains: Amount,

    /// Foreign interest
    pub foreign_interest: Amount,
    /// Foreign dividends
    pub foreign_dividends: Amount,
    /// Country of foreign accounts (informational)
    pub foreign_country: String,
    /// Highest foreign bank account balance during the year
    pub foreign_bank_max_balance: Amount,

    /// Business gross receipts (Schedule C)
    pub business_income: Amount,
    /// Business expenses (Schedule C)
    pub business_expenses: Amount,

    /// Other income entries (1099-MISC/NEC etc.)
    pub misc_incomes: Vec<MiscIncome>,

    /// Traditional IRA contribution
    pub traditional_ira_contribution: Amount,
    /// Traditional 401(k) contribution, already excluded from wages (informational)
    pub traditional_401k_contribution: Amount,
    /// Roth 401(k) contribution (informational)
    pub roth_401k_contribution: Amount,
    /// Gross pension distribution, 1099-R box 1 (informational)
    pub pension_income: Amount,
    /// Taxable pension amount, 1099-R box 2a
    pub pension_taxable: Amount,

    /// HSA contribution made outside payroll
    pub hsa_self_contribution: Amount,
    /// Student loan interest paid
    pub student_loan_interest: Amount,

    /// Medical and dental expenses
    pub medical_expenses: Amount,
    /// State and local income or sales tax paid
    #[serde(rename = "statExciseTax", alias = "stateIncomeTax")]
    pub state_income_tax: Amount,
    /// Real estate property tax paid
    pub local_property_tax: Amount,
    /// Home mortgage interest
    pub mortgage_interest: Amount,
    /// Mortgage points paid
    pub mortgage_points: Amount,
    /// Charitable gifts by cash or check
    pub charitable_cash: Amount,
    /// Charitable gifts other than cash
    pub charitable_non_cash: Amount,
    /// Other itemized deductions
    pub other_itemized: Amount,

    /// Sum of the quarterly 1040-ES payments
    pub estimated_tax_payments: Amount,

    /// Claim the child tax credit for each dependent
    pub child_tax_credit: bool,
    /// Education credit amount
    pub education_credit: Amount,
    /// Earned income credit election (not computed)
    pub earned_income_credit: bool,
    /// Foreign tax credit amount
    pub foreign_tax_credit: Amount,

    /// Gifts received during the year
    pub gifts_received: Vec<GiftReceived>,

    /// Holds specified foreign financial assets
    pub has_foreign_assets: bool,
    /// Year-end value of foreign financial assets
    pub foreign_assets_value: Amount,
}

/// Miscellaneous income line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MiscIncome {
    pub description: String,
    pub amount: Amount,
    /// Federal tax withheld from this income
    pub withheld: Amount,
}

/// Gift received from a single donor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftReceived {
    pub from: String,
    pub amount: Amount,
    pub is_from_foreigner: bool,
}

impl FilerInput {
    /// Parsed filing status; `None` for blank or unrecognized text
    pub fn status(&self) -> Option<FilingStatus> {
        FilingStatus::from_str(&self.filing_status)
    }

    /// Whether a filing status has been chosen at all
    pub fn has_filing_status(&self) -> bool {
        !self.filing_status.trim().is_empty()
    }

    /// Look up a field description by wire name or alias
    pub fn field(key: &str) -> Option<&'static InputField> {
        Self::input_fields().iter().find(|f| f.matches(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_record_has_no_status() {
        let input = FilerInput::default();
        assert!(!input.has_filing_status());
        assert_eq!(input.status(), None);
        assert_eq!(input.dependents, 0);
        assert!(input.misc_incomes.is_empty());
    }

    #[test]
    fn deserializes_camel_case_export() {
        let json = r#"{
            "firstName": "Ada",
            "filingStatus": "married-joint",
            "dependents": "2",
            "w2Wages": "85000",
            "statExciseTax": 6000,
            "traditional401kContribution": "5000",
            "miscIncomes": [{ "description": "1099-NEC", "amount": "1200", "withheld": "" }],
            "giftsReceived": [{ "from": "Aunt", "amount": "20000", "isFromForeigner": true }],
            "hasForeignAssets": true
        }"#;
        let input: FilerInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.first_name, "Ada");
        assert_eq!(input.status(), Some(FilingStatus::MarriedJoint));
        assert_eq!(input.dependents, 2);
        assert_eq!(input.w2_wages.value(), dec!(85000));
        assert_eq!(input.state_income_tax.value(), dec!(6000));
        assert_eq!(input.traditional_401k_contribution.value(), dec!(5000));
        assert_eq!(input.misc_incomes[0].amount.value(), dec!(1200));
        assert_eq!(input.misc_incomes[0].withheld.value(), dec!(0));
        assert!(input.gifts_received[0].is_from_foreigner);
        assert!(input.has_foreign_assets);
    }

    #[test]
    fn state_tax_accepts_either_key() {
        let input: FilerInput = serde_json::from_str(r#"{ "stateIncomeTax": "700" }"#).unwrap();
        assert_eq!(input.state_income_tax.value(), dec!(700));

        let exported = serde_json::to_value(&input).unwrap();
        assert_eq!(exported["statExciseTax"], "700");
        assert!(exported.get("stateIncomeTax").is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let input: FilerInput =
            serde_json::from_str(r#"{ "filingStatus": "single", "favouriteColour": "blue" }"#)
                .unwrap();
        assert_eq!(input.status(), Some(FilingStatus::Single));
    }

    #[test]
    fn unrecognized_status_is_present_but_unparsed() {
        let input = FilerInput {
            filing_status: "qualifying-widow".to_string(),
            ..Default::default()
        };
        assert!(input.has_filing_status());
        assert_eq!(input.status(), None);
    }

    #[test]
    fn field_table_uses_wire_names() {
        let fields = FilerInput::input_fields();
        assert!(fields.iter().any(|f| f.name == "w2Wages" && f.kind == "money"));
        assert!(fields.iter().any(|f| f.name == "childTaxCredit" && f.kind == "flag"));
        assert!(fields.iter().any(|f| f.name == "dependents" && f.kind == "count"));
        assert!(fields.iter().any(|f| f.name == "miscIncomes" && f.kind == "list"));
        assert!(fields.iter().any(|f| f.name == "traditional401kContribution"));
        assert_eq!(fields.len(), 44);
    }

    #[test]
    fn field_lookup_honours_aliases() {
        let field = FilerInput::field("stateIncomeTax").unwrap();
        assert_eq!(field.name, "statExciseTax");
        assert_eq!(field.aliases, ["stateIncomeTax"]);
        assert!(FilerInput::field("nope").is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let input = FilerInput {
            filing_status: "single".to_string(),
            w2_wages: Amount::new("60,000"),
            ..Default::default()
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains(r#""statExciseTax":"""#));
        let back: FilerInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
