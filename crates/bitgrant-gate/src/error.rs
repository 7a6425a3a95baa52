//! Gate error types.

use thiserror::Error;

/// Message used when a denial does not carry one of its own.
pub const DEFAULT_DENY_MESSAGE: &str = "Access Denied";

/// Errors raised by the authorization gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A guarded action was not authorized.
    #[error("{}", message.as_deref().unwrap_or(DEFAULT_DENY_MESSAGE))]
    Forbidden {
        /// Message configured on the guard, if any.
        message: Option<String>,
    },

    /// A rights spec could not be parsed.
    #[error("invalid rights spec `{input}`: {reason}")]
    InvalidSpec {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl GateError {
    /// A denial carrying `message`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: Some(message.into()),
        }
    }

    /// Whether this is a denial.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// HTTP status a hosting framework should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden { .. } => 403,
            Self::InvalidSpec { .. } => 500,
        }
    }
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
