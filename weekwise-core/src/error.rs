//! Typed errors for the scheduling core.
//!
//! Only hard structural problems are errors: malformed task fields, an
//! inverted date range, an unrecognized recurrence pattern. Everything that
//! is merely "couldn't satisfy a soft constraint" is reported as a warning
//! string on the produced schedule instead.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// Malformed task fields rejected before entering the scheduler.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A recurrence range with the end before the start.
    #[error("invalid date range: {end} is before {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A recurrence pattern string the parser does not recognize.
    #[error("unknown recurrence pattern: {0}")]
    UnknownPattern(String),
}
