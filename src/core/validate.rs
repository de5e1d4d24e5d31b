use super::types::{FieldViolation, ProjectionInput, ValidationResult};

/// Checks the age ordering the projection depends on.
///
/// Every rule is evaluated so that all offending fields are reported together.
pub fn validate(input: &ProjectionInput) -> ValidationResult {
    let mut violations = Vec::with_capacity(3);

    if input.current_age == 0 {
        violations.push(FieldViolation::InvalidCurrentAge);
    }
    if input.retire_age <= input.current_age {
        violations.push(FieldViolation::RetireNotAfterCurrent);
    }
    if input.death_age <= input.retire_age {
        violations.push(FieldViolation::DeathNotAfterRetire);
    }

    ValidationResult::new(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Field;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn with_ages(current_age: u32, retire_age: u32, death_age: u32) -> ProjectionInput {
        ProjectionInput {
            current_age,
            retire_age,
            death_age,
            current_salary: 0.0,
            current_expense: 20_000.0,
            current_savings: 0.0,
            annual_return_before_retire: 0.07,
            annual_return_after_retire: 0.04,
            inflation_rate: 0.03,
            legacy_target: 0.0,
        }
    }

    #[test]
    fn accepts_strictly_increasing_ages() {
        let result = validate(&with_ages(30, 60, 85));
        assert!(result.is_valid());
        assert!(result.violations().is_empty());
    }

    #[test]
    fn accepts_minimal_one_year_periods() {
        assert!(validate(&with_ages(1, 2, 3)).is_valid());
    }

    #[test]
    fn rejects_zero_current_age() {
        let result = validate(&with_ages(0, 60, 85));
        assert_eq!(result.violations(), &[FieldViolation::InvalidCurrentAge]);
    }

    #[test]
    fn rejects_retirement_at_current_age() {
        let result = validate(&with_ages(60, 60, 85));
        assert_eq!(result.violations(), &[FieldViolation::RetireNotAfterCurrent]);
    }

    #[test]
    fn rejects_death_before_retirement() {
        let result = validate(&with_ages(30, 60, 59));
        assert_eq!(result.violations(), &[FieldViolation::DeathNotAfterRetire]);
    }

    #[test]
    fn reports_all_violations_together() {
        let result = validate(&with_ages(0, 0, 0));
        assert_eq!(
            result.violations(),
            &[
                FieldViolation::InvalidCurrentAge,
                FieldViolation::RetireNotAfterCurrent,
                FieldViolation::DeathNotAfterRetire,
            ]
        );
        assert_eq!(
            result.violation_for(Field::DeathAge),
            Some(FieldViolation::DeathNotAfterRetire)
        );
    }

    #[test]
    fn later_rules_do_not_depend_on_earlier_ones() {
        // retire age is wrong, death age is still checked against it
        let result = validate(&with_ages(50, 40, 45));
        assert_eq!(result.violations(), &[FieldViolation::RetireNotAfterCurrent]);

        let result = validate(&with_ages(50, 40, 40));
        assert_eq!(
            result.violations(),
            &[
                FieldViolation::RetireNotAfterCurrent,
                FieldViolation::DeathNotAfterRetire,
            ]
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_validity_matches_age_ordering(
            current_age in 0u32..120,
            retire_age in 0u32..120,
            death_age in 0u32..120
        ) {
            let result = validate(&with_ages(current_age, retire_age, death_age));
            let expected = current_age > 0 && retire_age > current_age && death_age > retire_age;
            prop_assert_eq!(result.is_valid(), expected);
            prop_assert_eq!(
                result.violation_for(Field::CurrentAge).is_some(),
                current_age == 0
            );
            prop_assert_eq!(
                result.violation_for(Field::RetireAge).is_some(),
                retire_age <= current_age
            );
            prop_assert_eq!(
                result.violation_for(Field::DeathAge).is_some(),
                death_age <= retire_age
            );
            prop_assert!(result.violations().len() <= 3);
        }
    }
}
