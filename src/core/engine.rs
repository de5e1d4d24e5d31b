use super::types::{ProjectionInput, ProjectionResult, Timeline, ValidationError};
use super::validate::validate;

/// Retirement spending is modelled as 70% of working-life spending.
const RETIREMENT_EXPENSE_RATIO: f64 = 0.7;
const MONTHS_PER_YEAR: u32 = 12;
/// Real rates this close to zero are summed rather than discounted. This
/// deliberately widens the exact-zero special case: the closed-form annuity
/// loses all precision once `1 + r` rounds to `1`, and the sum differs from
/// the discounted value by about `months * r / 2` relative.
const ZERO_REAL_RATE_TOLERANCE: f64 = 1e-12;

/// Validates `input` and projects it only when every age rule holds.
pub fn calculate(input: &ProjectionInput) -> Result<ProjectionResult, ValidationError> {
    validate(input).into_result()?;
    Ok(project(input))
}

/// Projects retirement need against projected savings.
///
/// Callers must have validated `input`; both periods are assumed positive.
pub fn project(input: &ProjectionInput) -> ProjectionResult {
    let savings_period_years = input.retire_age.saturating_sub(input.current_age);
    let spending_period_years = input.death_age.saturating_sub(input.retire_age);
    let spending_months = spending_period_years.saturating_mul(MONTHS_PER_YEAR);

    let expense_at_retirement = input.current_expense
        * RETIREMENT_EXPENSE_RATIO
        * compound(input.inflation_rate, savings_period_years);

    let monthly_nominal_rate = monthly_rate_from_annual(input.annual_return_after_retire);
    let monthly_inflation_rate = monthly_rate_from_annual(input.inflation_rate);
    let monthly_real_rate = real_rate(monthly_nominal_rate, monthly_inflation_rate);

    let total_needed_during_retirement =
        annuity_present_value(expense_at_retirement, monthly_real_rate, spending_months);
    let legacy_present_value = input.legacy_target / compound(monthly_nominal_rate, spending_months);
    let total_needed = total_needed_during_retirement + legacy_present_value;

    let total_projected_savings =
        input.current_savings * compound(input.annual_return_before_retire, savings_period_years);
    let need_or_surplus = total_needed - total_projected_savings;

    let required_monthly_saving = if need_or_surplus > 0.0 {
        required_monthly_payment(
            need_or_surplus,
            input.annual_return_before_retire,
            savings_period_years.saturating_mul(MONTHS_PER_YEAR),
        )
    } else {
        0.0
    };

    ProjectionResult {
        savings_period_years,
        spending_period_years,
        expense_at_retirement,
        total_needed_during_retirement,
        legacy_present_value,
        total_needed,
        total_projected_savings,
        need_or_surplus,
        required_monthly_saving,
    }
}

/// Periods implied by the ages, floored at zero. Safe on unvalidated input.
pub fn timeline(input: &ProjectionInput) -> Timeline {
    Timeline {
        savings_period_years: input.retire_age.saturating_sub(input.current_age),
        spending_period_years: input.death_age.saturating_sub(input.retire_age),
    }
}

fn compound(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powf(periods as f64)
}

/// Effective monthly rate with the same annual growth.
fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / MONTHS_PER_YEAR as f64) - 1.0
}

fn real_rate(nominal_rate: f64, inflation_rate: f64) -> f64 {
    (1.0 + nominal_rate) / (1.0 + inflation_rate) - 1.0
}

/// Present value of `months` end-of-month payments of `payment`.
fn annuity_present_value(payment: f64, rate: f64, months: u32) -> f64 {
    if rate.abs() < ZERO_REAL_RATE_TOLERANCE {
        return payment * months as f64;
    }
    payment * (1.0 - (1.0 + rate).powf(-(months as f64))) / rate
}

/// Monthly deposit that grows to `target` after `months` at `annual_rate / 12`.
fn required_monthly_payment(target: f64, annual_rate: f64, months: u32) -> f64 {
    let monthly_rate = annual_rate / MONTHS_PER_YEAR as f64;
    let denominator = compound(monthly_rate, months) - 1.0;
    if denominator != 0.0 {
        let payment = target * monthly_rate / denominator;
        if payment.is_finite() { payment } else { 0.0 }
    } else if months > 0 {
        target / months as f64
    } else {
        0.0
    }
}
