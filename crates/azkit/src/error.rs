//! Error types for gateway operations.
//!
//! Errors are categorized so callers can tell a missing resource apart from
//! a broken request or an unreachable endpoint without string matching.

use thiserror::Error;

/// Categories of gateway errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The addressed resource does not exist
    NotFound,
    /// Network-related errors (transient)
    Network,
    /// Credentials missing, expired or lacking permission
    Auth,
    /// The request conflicts with the current state of the resource
    Conflict,
    /// The request was rejected as malformed or illegal
    InvalidRequest,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authorization failed",
            Self::Conflict => "Conflicting resource state",
            Self::InvalidRequest => "Invalid request",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur while talking to the cloud.
#[derive(Debug, Error)]
pub enum Error {
    /// The addressed resource does not exist
    #[error("{kind} not found: {name}")]
    NotFound {
        /// Resource kind, e.g. "disk"
        kind: &'static str,
        /// Name the lookup was made with
        name: String,
    },

    /// Network-related error (connection, timeout, DNS, etc.)
    #[error("network error: {message}")]
    Network {
        /// Detailed error message from the failed request
        message: String,
    },

    /// Authorization failure
    #[error("authorization failed: {message}")]
    Auth {
        /// Details about what was denied
        message: String,
    },

    /// Conflicting state on the server
    #[error("conflict: {message}")]
    Conflict {
        /// Description of the conflict
        message: String,
    },

    /// The server rejected the request
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Reason given for the rejection
        message: String,
    },

    /// A resource name breaks the naming rules
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        /// Resource kind, e.g. "disk"
        kind: &'static str,
        /// The offending name
        name: String,
        /// Which rule was broken
        reason: &'static str,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Network { .. } => ErrorCategory::Network,
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::Conflict { .. } => ErrorCategory::Conflict,
            Error::InvalidRequest { .. } | Error::InvalidName { .. } => {
                ErrorCategory::InvalidRequest
            }
            _ => ErrorCategory::Other,
        }
    }

    /// Whether the addressed resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Whether this error is typically transient.
    pub fn is_transient(&self) -> bool {
        self.category().is_transient()
    }

    pub(crate) fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
