use serde::Serialize;
use thiserror::Error;

/// One calculation request, already normalized to plain numbers.
///
/// Rates are fractions (`0.07` for 7%). Ages are whole years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub current_age: u32,
    pub retire_age: u32,
    pub death_age: u32,
    /// Collected with the rest of the form but not used by the projection.
    pub current_salary: f64,
    /// Monthly living expense in today's money.
    pub current_expense: f64,
    pub current_savings: f64,
    pub annual_return_before_retire: f64,
    pub annual_return_after_retire: f64,
    pub inflation_rate: f64,
    /// Amount to leave behind at `death_age`.
    pub legacy_target: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub savings_period_years: u32,
    pub spending_period_years: u32,
    pub expense_at_retirement: f64,
    pub total_needed_during_retirement: f64,
    pub legacy_present_value: f64,
    pub total_needed: f64,
    pub total_projected_savings: f64,
    pub need_or_surplus: f64,
    pub required_monthly_saving: f64,
}

impl ProjectionResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_need(self.need_or_surplus)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Shortfall,
    Surplus,
    Neutral,
}

impl Verdict {
    pub fn from_need(need_or_surplus: f64) -> Self {
        if need_or_surplus > 0.0 {
            Verdict::Shortfall
        } else if need_or_surplus < 0.0 {
            Verdict::Surplus
        } else {
            Verdict::Neutral
        }
    }
}

/// Savings and spending periods clamped at zero, usable before validation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub savings_period_years: u32,
    pub spending_period_years: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    CurrentAge,
    RetireAge,
    DeathAge,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum FieldViolation {
    #[error("current age must be greater than zero")]
    InvalidCurrentAge,
    #[error("retirement age must be greater than current age")]
    RetireNotAfterCurrent,
    #[error("life expectancy must be greater than retirement age")]
    DeathNotAfterRetire,
}

impl FieldViolation {
    pub fn field(self) -> Field {
        match self {
            FieldViolation::InvalidCurrentAge => Field::CurrentAge,
            FieldViolation::RetireNotAfterCurrent => Field::RetireAge,
            FieldViolation::DeathNotAfterRetire => Field::DeathAge,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            FieldViolation::InvalidCurrentAge => "invalid-current-age",
            FieldViolation::RetireNotAfterCurrent => "retire-not-after-current",
            FieldViolation::DeathNotAfterRetire => "death-not-after-retire",
        }
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ValidationResult {
    violations: Vec<FieldViolation>,
}

impl ValidationResult {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in rule order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn violation_for(&self, field: Field) -> Option<FieldViolation> {
        self.violations.iter().copied().find(|v| v.field() == field)
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("invalid input: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Language used for user-facing violation messages.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Locale {
    #[default]
    En,
    Th,
}
