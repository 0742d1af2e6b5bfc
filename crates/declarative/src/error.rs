//! Error types for reconciliation passes.
//!
//! A pass fails for one of two reasons: the change set is illegal
//! (validation) or the cloud could not be reached or refused the call
//! (transport). Validation errors are always raised before any remote
//! mutation; transport errors carry the gateway's error unchanged.

use crate::types::Lifecycle;
use thiserror::Error;

/// Errors raised by a reconciliation pass.
#[derive(Debug, Error)]
pub enum Error {
    /// A field needed to create the resource is unset
    #[error("{kind}: field {field} is required")]
    RequiredField {
        /// Task kind, e.g. "Disk"
        kind: &'static str,
        /// Field name as users know it
        field: &'static str,
    },

    /// The change set touches a field that is immutable after creation
    #[error("{kind}: field {field} cannot be changed")]
    CannotChangeField {
        /// Task kind, e.g. "Disk"
        kind: &'static str,
        /// Field name as users know it
        field: &'static str,
    },

    /// The resource's lifecycle forbids what the pass would do
    #[error("{kind} {id}: lifecycle is {lifecycle} but {reason}")]
    Lifecycle {
        /// Task kind
        kind: &'static str,
        /// Resource identifier
        id: String,
        /// Lifecycle of the task
        lifecycle: Lifecycle,
        /// What went against it
        reason: String,
    },

    /// Any other illegal state of the descriptor
    #[error("{kind} {id}: {message}")]
    Invalid {
        /// Task kind
        kind: &'static str,
        /// Resource identifier
        id: String,
        /// Description of the problem
        message: String,
    },

    /// Failure reported by the cloud gateway
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Shorthand for [`Error::RequiredField`].
    pub fn required_field(kind: &'static str, field: &'static str) -> Self {
        Error::RequiredField { kind, field }
    }

    /// Shorthand for [`Error::CannotChangeField`].
    pub fn cannot_change_field(kind: &'static str, field: &'static str) -> Self {
        Error::CannotChangeField { kind, field }
    }

    /// Wrap a gateway error.
    ///
    /// Written to be used as `.map_err(Error::transport)`.
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Transport(err.into())
    }

    /// Whether the caller can fix this by correcting the descriptor.
    pub fn is_validation(&self) -> bool {
        !self.is_transport()
    }

    /// Whether this came from the cloud gateway.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result type for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;
