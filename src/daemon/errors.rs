//! Daemon Error Types
//!
//! Every failure of a daemon operation is returned to the immediate caller.
//! Nothing is retried; nothing is healed behind the caller's back.

use std::fmt;

use crate::schema::SchemaError;

/// Daemon error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonError {
    /// Error kind
    pub kind: DaemonErrorKind,
    /// Error message
    pub message: String,
}

/// Daemon error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonErrorKind {
    /// Operation invoked while the daemon is already in the target state
    InvalidState,

    /// A read was requested but no result was ever configured
    Unconfigured,

    /// Actual input or query differs from what was expected
    Mismatch,

    /// The implementation cannot perform this operation at all
    Unsupported,

    /// A caller-supplied argument was malformed
    InvalidArgument,

    /// A failure the test author scripted
    Injected,

    /// The context was cancelled
    Cancelled,

    /// The context deadline passed
    DeadlineExceeded,
}

impl DaemonErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidState => "invalid_state",
            Self::Unconfigured => "unconfigured",
            Self::Mismatch => "mismatch",
            Self::Unsupported => "unsupported",
            Self::InvalidArgument => "invalid_argument",
            Self::Injected => "injected",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

impl DaemonError {
    /// Create a new daemon error.
    pub fn new(kind: DaemonErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(DaemonErrorKind::InvalidState, message)
    }

    /// Create an unconfigured fixture error.
    pub fn unconfigured(message: impl Into<String>) -> Self {
        Self::new(DaemonErrorKind::Unconfigured, message)
    }

    /// Create a mismatch error naming both values.
    pub fn mismatch(what: &str, expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::new(
            DaemonErrorKind::Mismatch,
            format!("wrong {}: expected {} got {}", what, expected, actual),
        )
    }

    /// Create an unsupported operation error.
    pub fn unsupported(operation: &str) -> Self {
        Self::new(
            DaemonErrorKind::Unsupported,
            format!("{} is not supported by this daemon", operation),
        )
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(DaemonErrorKind::InvalidArgument, message)
    }

    /// Create a scripted failure.
    pub fn injected(message: impl Into<String>) -> Self {
        Self::new(DaemonErrorKind::Injected, message)
    }

    /// Create a cancellation error.
    pub fn cancelled() -> Self {
        Self::new(DaemonErrorKind::Cancelled, "context cancelled")
    }

    /// Create a deadline error.
    pub fn deadline_exceeded() -> Self {
        Self::new(DaemonErrorKind::DeadlineExceeded, "context deadline exceeded")
    }

    /// True when the error reports a failed expectation, as opposed to a
    /// path the daemon cannot simulate or a runtime condition.
    pub fn is_assertion_failure(&self) -> bool {
        self.kind == DaemonErrorKind::Mismatch
    }
}

impl fmt::Display for DaemonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DaemonError({:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for DaemonError {}

impl From<SchemaError> for DaemonError {
    fn from(e: SchemaError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

/// Result type for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
