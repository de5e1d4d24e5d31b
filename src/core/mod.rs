mod engine;
mod report;
mod types;
mod validate;

pub use engine::{calculate, project, timeline};
pub use report::{DisplayResult, FieldMessages, format_grouped};
pub use types::{
    Field, FieldViolation, Locale, ProjectionInput, ProjectionResult, Timeline, ValidationError,
    ValidationResult, Verdict,
};
pub use validate::validate;
