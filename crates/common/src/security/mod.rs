//! Credential storage primitives
//!
//! `KeychainProvider` wraps the platform keychain (macOS Keychain Access,
//! Windows Credential Manager, Linux Secret Service) and is only compiled
//! with the `platform` feature. `KeychainError` is always available so
//! callers can name it regardless of features.

#[cfg(feature = "platform")]
pub mod keychain;

use thiserror::Error;

#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;

/// Keychain operation errors
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found
    #[error("Entry not found")]
    NotFound,

    /// Stored metadata could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(error: &KeychainError) -> &'static str {
        match error {
            KeychainError::AccessFailed(_) => "access",
            KeychainError::NotFound => "not-found",
            KeychainError::Serialization(_) => "serialization",
        }
    }

    #[test]
    fn serde_errors_convert_into_serialization() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let serialization = KeychainError::from(parse.unwrap_err());

        assert_eq!(kind(&serialization), "serialization");
        assert_eq!(kind(&KeychainError::NotFound), "not-found");
        assert_eq!(kind(&KeychainError::AccessFailed("locked".to_string())), "access");
    }
}
