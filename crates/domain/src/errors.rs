//! Validation errors raised by domain records before they reach the network

use thiserror::Error;

/// Domain validation error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An update or delete needs an identifier the record does not carry.
    #[error("{kind} has no identifier")]
    MissingIdentifier { kind: &'static str },

    /// A create was attempted with a record that already has an identifier.
    #[error("{kind} already has identifier {id}")]
    UnexpectedIdentifier { kind: &'static str, id: String },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidField`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField { field, reason: reason.into() }
    }
}

/// Result type alias for domain validation
pub type Result<T> = std::result::Result<T, DomainError>;
