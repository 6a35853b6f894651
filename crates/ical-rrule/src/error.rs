//! Error types for recurrence expansion.

use ical_core::IcalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecurError {
    /// The evaluator rejected the rule or the recurrence set built from it.
    #[error("Invalid RRULE: {0}")]
    InvalidRule(String),

    #[error("Expansion error: {0}")]
    Expansion(String),

    /// Reading the component's recurrence properties failed.
    #[error(transparent)]
    Ical(#[from] IcalError),
}

pub type Result<T> = std::result::Result<T, RecurError>;
