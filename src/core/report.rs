use serde::Serialize;

use super::types::{Field, FieldViolation, Locale, ProjectionResult, Verdict};

impl FieldViolation {
    pub fn message(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, FieldViolation::InvalidCurrentAge) => "Please enter a valid current age.",
            (Locale::En, FieldViolation::RetireNotAfterCurrent) => {
                "Retirement age must be greater than current age."
            }
            (Locale::En, FieldViolation::DeathNotAfterRetire) => {
                "Life expectancy must be greater than retirement age."
            }
            (Locale::Th, FieldViolation::InvalidCurrentAge) => "กรุณาใส่อายุที่ถูกต้อง!",
            (Locale::Th, FieldViolation::RetireNotAfterCurrent) => {
                "อายุเกษียณต้องมากกว่าอายุปัจจุบัน!"
            }
            (Locale::Th, FieldViolation::DeathNotAfterRetire) => "อายุขัยต้องมากกว่าอายุเกษียณ!",
        }
    }
}

/// Message to show next to each age field. `None` clears the field.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMessages {
    pub current_age: Option<&'static str>,
    pub retire_age: Option<&'static str>,
    pub death_age: Option<&'static str>,
}

impl FieldMessages {
    pub fn from_violations(violations: &[FieldViolation], locale: Locale) -> Self {
        let message = |field| {
            violations
                .iter()
                .find(|v| v.field() == field)
                .map(|v| v.message(locale))
        };
        Self {
            current_age: message(Field::CurrentAge),
            retire_age: message(Field::RetireAge),
            death_age: message(Field::DeathAge),
        }
    }
}

/// A projection rounded to whole currency units and grouped for display.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayResult {
    pub verdict: Verdict,
    pub savings_period_years: String,
    pub spending_period_years: String,
    pub expense_at_retirement: String,
    pub total_needed_during_retirement: String,
    pub legacy_present_value: String,
    pub total_needed: String,
    pub total_projected_savings: String,
    /// Magnitude only; `verdict` carries the sign.
    pub need_or_surplus: String,
    pub required_monthly_saving: String,
}

impl DisplayResult {
    pub fn from_result(result: &ProjectionResult) -> Self {
        let whole = |value: f64| format_grouped(value, 0);
        Self {
            verdict: result.verdict(),
            savings_period_years: whole(result.savings_period_years as f64),
            spending_period_years: whole(result.spending_period_years as f64),
            expense_at_retirement: whole(result.expense_at_retirement),
            total_needed_during_retirement: whole(result.total_needed_during_retirement),
            legacy_present_value: whole(result.legacy_present_value),
            total_needed: whole(result.total_needed),
            total_projected_savings: whole(result.total_projected_savings),
            need_or_surplus: whole(result.need_or_surplus.abs()),
            required_monthly_saving: whole(result.required_monthly_saving),
        }
    }

    pub fn render_text(&self) -> String {
        let need_label = match self.verdict {
            Verdict::Shortfall => "Shortfall",
            Verdict::Surplus => "Surplus",
            Verdict::Neutral => "Balanced",
        };
        let rows = [
            ("Savings period (years)", &self.savings_period_years),
            ("Spending period (years)", &self.spending_period_years),
            ("Monthly expense at retirement", &self.expense_at_retirement),
            ("Needed during retirement", &self.total_needed_during_retirement),
            ("Legacy (present value)", &self.legacy_present_value),
            ("Total needed", &self.total_needed),
            ("Projected savings", &self.total_projected_savings),
            (need_label, &self.need_or_surplus),
            ("Required monthly saving", &self.required_monthly_saving),
        ];

        render_rows(&rows)
    }
}

/// Left-aligned labels, right-aligned values. Width counts chars, matching
/// how `format!` pads, so non-ASCII labels line up too.
fn render_rows(rows: &[(&str, &String)]) -> String {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{label:<width$}  {value:>15}\n"));
    }
    out
}

/// Rounds `value` to `decimals` places and groups the integer digits by
/// thousands, e.g. `1234567.891` with 2 decimals gives `1,234,567.89`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let scale = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * scale).round() / scale;
    let rendered = format!("{rounded:.decimals$}");
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + rendered.len() / 3 + 1);
    if value < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
