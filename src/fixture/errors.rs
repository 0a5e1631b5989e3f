//! # Fixture Errors

use thiserror::Error;

use crate::daemon::DaemonError;

/// Result type for fixture operations
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Fixture errors
#[derive(Debug, Clone, Error)]
pub enum FixtureError {
    // Loading errors
    #[error("Cannot read fixture {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Cannot parse fixture {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid fixture: {0}")]
    Invalid(String),

    // Replay errors
    #[error("Step {index} ({op}) failed: {source}")]
    StepFailed {
        index: usize,
        op: &'static str,
        #[source]
        source: DaemonError,
    },

    #[error("Step {index} ({op}): {message}")]
    Expectation {
        index: usize,
        op: &'static str,
        message: String,
    },
}

impl FixtureError {
    /// Index of the failing step, for replay errors
    pub fn step_index(&self) -> Option<usize> {
        match self {
            FixtureError::StepFailed { index, .. } | FixtureError::Expectation { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True when the fixture itself could not be loaded
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            FixtureError::Read { .. } | FixtureError::Parse { .. } | FixtureError::Invalid(_)
        )
    }
}
