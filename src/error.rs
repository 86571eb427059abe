//! Structural errors.
//!
//! These abort an invocation before any assignment work begins. Slots or
//! blocks that cannot be filled are not errors; they are reported as
//! [`Violation`](crate::models::Violation)s on the returned schedule.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

/// Fatal scheduling error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    /// The calendar window ends before it starts.
    #[error("invalid calendar range: end {end} precedes start {start}")]
    InvalidRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// The roster has no people.
    #[error("roster is empty")]
    EmptyRoster,

    /// The roster or configuration failed structural validation.
    #[error("invalid scheduling request: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
