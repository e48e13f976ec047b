use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// A monetary amount exactly as the filer typed it.
///
/// Input is kept as free-form text so a draft round-trips unchanged; the
/// numeric value is only derived on demand via [`Amount::value`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Amount(String);

/// Largest value a single amount field contributes, one quadrillion dollars.
///
/// Keeps every engine sum well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

// Integer digits in MAX_AMOUNT.
const MAX_INTEGER_DIGITS: usize = 16;

impl Amount {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        Amount(text.into())
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-negative numeric value; blank, invalid or negative input is zero.
    pub fn value(&self) -> Decimal {
        parse_amount(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        };
        Ok(Amount(text))
    }
}

/// Parse free-form money text the way a lenient form field would.
///
/// A leading `$` and `,` separators are ignored, then the longest numeric
/// prefix is read (`"12abc"` is 12). Anything unparseable or negative is zero,
/// and anything above [`MAX_AMOUNT`] is [`MAX_AMOUNT`].
pub fn parse_amount(text: &str) -> Decimal {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let prefix = numeric_prefix(&cleaned);
    if prefix.is_empty() || prefix.starts_with('-') {
        return Decimal::ZERO;
    }
    let unsigned = prefix.trim_start_matches('+');
    let literal = if unsigned.starts_with('.') {
        format!("0{unsigned}")
    } else {
        unsigned.to_string()
    };

    let whole = literal.split('.').next().unwrap_or_default();
    if whole.trim_start_matches('0').len() > MAX_INTEGER_DIGITS {
        return MAX_AMOUNT;
    }

    Decimal::from_str(&literal)
        .map(|v| v.clamp(Decimal::ZERO, MAX_AMOUNT))
        .unwrap_or(Decimal::ZERO)
}

fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut digits = 0;
    let mut seen_dot = false;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if digits == 0 {
        return "";
    }
    // "5." is not a valid decimal literal
    s[..end].trim_end_matches('.')
}

/// Lenient count parsing used for whole-number fields such as dependents.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let count = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_amount("60000"), dec!(60000));
        assert_eq!(parse_amount("1234.56"), dec!(1234.56));
        assert_eq!(parse_amount("  42 "), dec!(42));
    }

    #[test]
    fn blank_and_garbage_are_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("."), Decimal::ZERO);
        assert_eq!(parse_amount("-"), Decimal::ZERO);
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(parse_amount("-500"), Decimal::ZERO);
    }

    #[test]
    fn leading_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), dec!(12));
        assert_eq!(parse_amount(".5"), dec!(0.5));
        assert_eq!(parse_amount("7."), dec!(7));
        assert_eq!(parse_amount("1.2.3"), dec!(1.2));
    }

    #[test]
    fn currency_symbol_and_separators() {
        assert_eq!(parse_amount("$1,250.00"), dec!(1250.00));
        assert_eq!(parse_amount("$ 10"), Decimal::ZERO);
    }

    #[test]
    fn huge_values_clamp_to_max() {
        assert_eq!(parse_amount("1000000000000000"), MAX_AMOUNT);
        assert_eq!(parse_amount("1000000000000000.01"), MAX_AMOUNT);
        assert_eq!(parse_amount("999999999999999.99"), dec!(999999999999999.99));
        assert_eq!(
            parse_amount("50000000000000000000000000000"),
            MAX_AMOUNT
        );
        assert_eq!(
            parse_amount("123456789012345678901234567890123"),
            MAX_AMOUNT
        );
        assert_eq!(parse_amount("$9,999,999,999,999,999,999"), MAX_AMOUNT);
        assert_eq!(parse_amount("0000000000000000000042"), dec!(42));
    }

    #[test]
    fn deserialize_from_string_number_and_null() {
        let a: Amount = serde_json::from_str("\"15000\"").unwrap();
        assert_eq!(a.value(), dec!(15000));

        let b: Amount = serde_json::from_str("15000.5").unwrap();
        assert_eq!(b.value(), dec!(15000.5));

        let c: Amount = serde_json::from_str("null").unwrap();
        assert_eq!(c.as_str(), "");
        assert_eq!(c.value(), Decimal::ZERO);

        let d: Amount = serde_json::from_str("true").unwrap();
        assert_eq!(d.value(), Decimal::ZERO);
    }

    #[test]
    fn serializes_as_typed_text() {
        let a = Amount::new("1,000");
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"1,000\"");
    }
}
