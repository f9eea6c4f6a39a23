//! Error types for the Attendance Reconciliation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during attendance processing.
//!
//! Note that an ambiguous shift match is NOT an error: it is a defined
//! outcome (escalation to manual review) and is reported through
//! [`crate::matching::MatchOutcome`], never through [`EngineError`].

use chrono::NaiveDate;
use uuid::Uuid;

/// The main error type for the Attendance Reconciliation Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/settings.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/settings.yaml");
/// ```
#[derive(Debug)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An external read (catalog, settings, or OD lookup) failed.
    ///
    /// This aborts the current (employee, date) unit only and is retryable.
    SourceUnavailable {
        /// The name of the source that failed (e.g., "shift catalog").
        source: String,
        /// A description of the failure.
        message: String,
    },

    /// A shift ID was not found among the expected shift definitions.
    ShiftNotFound {
        /// The shift ID that was not found.
        shift_id: String,
    },

    /// No confused-shift record exists with the given ID.
    ReviewNotFound {
        /// The record ID that was not found.
        id: Uuid,
    },

    /// A confused-shift record was not in a state that permits the
    /// requested transition (only pending records may be resolved or
    /// dismissed).
    InvalidReviewState {
        /// The record ID.
        id: Uuid,
        /// The record's current status.
        status: String,
    },

    /// No punch history is retained for the given (employee, date) unit, so
    /// it cannot be reprocessed.
    PunchHistoryMissing {
        /// The employee ID.
        employee_id: String,
        /// The date of the unit.
        date: NaiveDate,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::ConfigNotFound { path } => {
                write!(f, "Configuration file not found: {path}")
            }
            EngineError::ConfigParseError { path, message } => {
                write!(f, "Failed to parse configuration file '{path}': {message}")
            }
            EngineError::SourceUnavailable { source, message } => {
                write!(f, "External source '{source}' unavailable: {message}")
            }
            EngineError::ShiftNotFound { shift_id } => {
                write!(f, "Shift not found: {shift_id}")
            }
            EngineError::ReviewNotFound { id } => {
                write!(f, "Confused-shift record not found: {id}")
            }
            EngineError::InvalidReviewState { id, status } => {
                write!(f, "Confused-shift record {id} is {status}, not pending")
            }
            EngineError::PunchHistoryMissing { employee_id, date } => {
                write!(f, "No punch history for employee '{employee_id}' on {date}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl EngineError {
    /// Returns true if the caller may retry the failed operation.
    ///
    /// Only external read failures are retryable; everything else indicates
    /// a caller mistake or an invalid state transition.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::SourceUnavailable { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/settings.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/settings.yaml"
        );
    }

    #[test]
    fn test_source_unavailable_displays_source_and_message() {
        let error = EngineError::SourceUnavailable {
            source: "shift catalog".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "External source 'shift catalog' unavailable: connection refused"
        );
    }

    #[test]
    fn test_only_source_failures_are_retryable() {
        let retryable = EngineError::SourceUnavailable {
            source: "od ledger".to_string(),
            message: "timeout".to_string(),
        };
        assert!(retryable.is_retryable());

        let invalid = EngineError::ShiftNotFound {
            shift_id: "shift_morning".to_string(),
        };
        assert!(!invalid.is_retryable());
    }

    #[test]
    fn test_invalid_review_state_displays_id_and_status() {
        let id = Uuid::nil();
        let error = EngineError::InvalidReviewState {
            id,
            status: "resolved".to_string(),
        };
        assert_eq!(
            error.to_string(),
            format!("Confused-shift record {} is resolved, not pending", id)
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_shift_not_found() -> EngineResult<()> {
            Err(EngineError::ShiftNotFound {
                shift_id: "missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_shift_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
