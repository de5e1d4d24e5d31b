use serde::Deserialize;

use crate::core::ProjectionInput;

/// A form value as typed: either a number or display text like `"฿1,250,000"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn amount(&self) -> f64 {
        match self {
            FieldValue::Number(v) if v.is_finite() => *v,
            FieldValue::Number(_) => 0.0,
            FieldValue::Text(text) => parse_amount(text),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// The ten calculator fields before normalization. Missing fields count as 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub current_age: Option<FieldValue>,
    pub retire_age: Option<FieldValue>,
    pub death_age: Option<FieldValue>,
    pub current_salary: Option<FieldValue>,
    pub current_expense: Option<FieldValue>,
    pub current_savings: Option<FieldValue>,
    /// Percent, pre-retirement.
    pub annual_return: Option<FieldValue>,
    /// Percent, post-retirement.
    pub post_retirement_return: Option<FieldValue>,
    /// Percent.
    pub inflation_rate: Option<FieldValue>,
    pub legacy: Option<FieldValue>,
}

impl RawInput {
    pub fn collect(&self) -> ProjectionInput {
        ProjectionInput {
            current_age: whole_years(amount(&self.current_age)),
            retire_age: whole_years(amount(&self.retire_age)),
            death_age: whole_years(amount(&self.death_age)),
            current_salary: amount(&self.current_salary),
            current_expense: amount(&self.current_expense),
            current_savings: amount(&self.current_savings),
            annual_return_before_retire: amount(&self.annual_return) / 100.0,
            annual_return_after_retire: amount(&self.post_retirement_return) / 100.0,
            inflation_rate: amount(&self.inflation_rate) / 100.0,
            legacy_target: amount(&self.legacy),
        }
    }
}

fn amount(value: &Option<FieldValue>) -> f64 {
    value.as_ref().map(FieldValue::amount).unwrap_or(0.0)
}

/// Truncates to whole years; anything non-positive or non-finite is 0.
pub fn whole_years(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u32
    } else {
        0
    }
}

/// Reads a number out of display text.
///
/// Grouping commas and a leading currency prefix are dropped, then the longest
/// numeric prefix is parsed, so `"12.5%"` reads as `12.5`. Text with no
/// number in it reads as `0`.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let body = cleaned
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.')));
    let end = numeric_prefix_len(body);
    body[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// `clap` value parser for amount flags; never fails, like the form fields.
pub fn amount_arg(text: &str) -> Result<f64, String> {
    Ok(parse_amount(text))
}

fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - (i + 1);
        if digits > 0 {
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parse_amount_strips_grouping_commas() {
        assert_approx(parse_amount("1,250,000"), 1_250_000.0);
        assert_approx(parse_amount("  20,000.75 "), 20_000.75);
        assert_approx(parse_amount("500000"), 500_000.0);
    }

    #[test]
    fn parse_amount_skips_currency_prefix() {
        assert_approx(parse_amount("฿20,000"), 20_000.0);
        assert_approx(parse_amount("$ 1,000.5"), 1_000.5);
        assert_approx(parse_amount("THB 42"), 42.0);
    }

    #[test]
    fn parse_amount_reads_leading_number_only() {
        assert_approx(parse_amount("7%"), 7.0);
        assert_approx(parse_amount("12.5 per year"), 12.5);
        assert_approx(parse_amount("1e3"), 1_000.0);
        assert_approx(parse_amount("1e"), 1.0);
        assert_approx(parse_amount("5."), 5.0);
        assert_approx(parse_amount(".25"), 0.25);
        assert_approx(parse_amount("-3"), -3.0);
    }

    #[test]
    fn parse_amount_defaults_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn whole_years_truncates_and_floors_at_zero() {
        assert_eq!(whole_years(30.9), 30);
        assert_eq!(whole_years(-5.0), 0);
        assert_eq!(whole_years(f64::NAN), 0);
        assert_eq!(whole_years(0.0), 0);
    }

    #[test]
    fn collect_normalizes_every_field() {
        let raw = RawInput {
            current_age: Some("30".into()),
            retire_age: Some(60.0.into()),
            death_age: Some("85".into()),
            current_salary: Some("50,000".into()),
            current_expense: Some("20,000".into()),
            current_savings: Some("฿500,000".into()),
            annual_return: Some("7".into()),
            post_retirement_return: Some(4.0.into()),
            inflation_rate: Some("3%".into()),
            legacy: None,
        };

        let input = raw.collect();
        assert_eq!(input.current_age, 30);
        assert_eq!(input.retire_age, 60);
        assert_eq!(input.death_age, 85);
        assert_approx(input.current_salary, 50_000.0);
        assert_approx(input.current_expense, 20_000.0);
        assert_approx(input.current_savings, 500_000.0);
        assert_approx(input.annual_return_before_retire, 0.07);
        assert_approx(input.annual_return_after_retire, 0.04);
        assert_approx(input.inflation_rate, 0.03);
        assert_eq!(input.legacy_target, 0.0);
    }

    #[test]
    fn empty_raw_input_collects_to_zeroes() {
        let input = RawInput::default().collect();
        assert_eq!(input.current_age, 0);
        assert_eq!(input.death_age, 0);
        assert_eq!(input.current_savings, 0.0);
        assert_eq!(input.inflation_rate, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_grouped_integers_parse_back(value in 0u64..1_000_000_000_000) {
            let grouped = crate::core::format_grouped(value as f64, 0);
            prop_assert_eq!(parse_amount(&grouped), value as f64);
        }
    }
}
