//! OAuth token storage helpers layered on top of `KeychainProvider`.
//!
//! A credential is split over three entries keyed by the API host:
//! `access.<host>`, `refresh.<host>` and `metadata.<host>` (JSON with the
//! token type, lifetime, expiry and scope).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::json;
use tracing::debug;

use crate::auth::traits::KeychainTrait;
use crate::auth::types::TokenSet;
use crate::security::{KeychainError, KeychainProvider};

const ACCESS_PREFIX: &str = "access.";
const REFRESH_PREFIX: &str = "refresh.";
const METADATA_PREFIX: &str = "metadata.";

impl KeychainProvider {
    /// Persist OAuth tokens in the platform keychain.
    ///
    /// # Errors
    /// Returns [`KeychainError`] if any entry cannot be written.
    pub fn store_tokens(&self, account: &str, tokens: &TokenSet) -> Result<(), KeychainError> {
        debug!(account = %account, "Storing OAuth tokens");

        self.set_secret(&format!("{ACCESS_PREFIX}{account}"), &tokens.access_token)?;

        match &tokens.refresh_token {
            Some(refresh) => self.set_secret(&format!("{REFRESH_PREFIX}{account}"), refresh)?,
            // Drop a refresh token left over from an earlier credential
            None => match self.delete_secret(&format!("{REFRESH_PREFIX}{account}")) {
                Ok(()) | Err(KeychainError::NotFound) => {}
                Err(other) => return Err(other),
            },
        }

        self.set_secret(&format!("{METADATA_PREFIX}{account}"), &encode_metadata(tokens)?)?;

        debug!(account = %account, "OAuth tokens stored");
        Ok(())
    }

    /// Retrieve OAuth tokens for the specified account.
    ///
    /// # Errors
    /// Returns [`KeychainError::NotFound`] when no access token is stored.
    pub fn retrieve_tokens(&self, account: &str) -> Result<TokenSet, KeychainError> {
        debug!(account = %account, "Retrieving OAuth tokens");

        let access_token = self.get_secret(&format!("{ACCESS_PREFIX}{account}"))?;

        let refresh_token = match self.get_secret(&format!("{REFRESH_PREFIX}{account}")) {
            Ok(value) => Some(value),
            Err(KeychainError::NotFound) => None,
            Err(other) => return Err(other),
        };

        let metadata = match self.get_secret(&format!("{METADATA_PREFIX}{account}")) {
            Ok(value) => Some(value),
            Err(KeychainError::NotFound) => None,
            Err(other) => return Err(other),
        };

        decode_tokens(access_token, refresh_token, metadata.as_deref())
    }

    /// Delete OAuth tokens associated with the given account.
    ///
    /// # Errors
    /// Never fails for missing entries; other keychain failures are
    /// returned.
    pub fn delete_tokens(&self, account: &str) -> Result<(), KeychainError> {
        debug!(account = %account, "Deleting OAuth tokens");

        for prefix in [ACCESS_PREFIX, REFRESH_PREFIX, METADATA_PREFIX] {
            match self.delete_secret(&format!("{prefix}{account}")) {
                Ok(()) | Err(KeychainError::NotFound) => {}
                Err(other) => return Err(other),
            }
        }

        Ok(())
    }

    /// Determine whether an access token exists for the account.
    #[must_use]
    pub fn has_tokens(&self, account: &str) -> bool {
        self.secret_exists(&format!("{ACCESS_PREFIX}{account}"))
    }
}

fn encode_metadata(tokens: &TokenSet) -> Result<String, KeychainError> {
    let metadata = json!({
        "expires_in": tokens.expires_in,
        "token_type": tokens.token_type,
        "scope": tokens.scope,
        "expires_at": tokens.expires_at.map(|dt| dt.timestamp()),
    });
    Ok(serde_json::to_string(&metadata)?)
}

fn decode_tokens(
    access_token: String,
    refresh_token: Option<String>,
    metadata: Option<&str>,
) -> Result<TokenSet, KeychainError> {
    let metadata: serde_json::Value = match metadata {
        Some(raw) => serde_json::from_str(raw)?,
        None => serde_json::Value::Null,
    };

    let expires_in = metadata.get("expires_in").and_then(|v| v.as_i64()).unwrap_or(0);
    let expires_at = metadata
        .get("expires_at")
        .and_then(|v| v.as_i64())
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    Ok(TokenSet {
        access_token,
        refresh_token,
        token_type: metadata
            .get("token_type")
            .and_then(|v| v.as_str())
            .unwrap_or("Bearer")
            .to_string(),
        expires_in,
        expires_at,
        scope: metadata.get("scope").and_then(|v| v.as_str()).map(String::from),
    })
}

#[async_trait]
impl KeychainTrait for KeychainProvider {
    async fn store_tokens(&self, account: &str, tokens: &TokenSet) -> Result<(), String> {
        self.store_tokens(account, tokens).map_err(|e| e.to_string())
    }

    async fn retrieve_tokens(&self, account: &str) -> Result<TokenSet, String> {
        self.retrieve_tokens(account).map_err(|e| e.to_string())
    }

    async fn delete_tokens(&self, account: &str) -> Result<(), String> {
        self.delete_tokens(account).map_err(|e| e.to_string())
    }

    async fn has_tokens(&self, account: &str) -> bool {
        self.has_tokens(account)
    }
}

#[cfg(test)]
mod tests {
    //! Metadata encoding only; the platform keychain itself is not touched.
    use super::*;

    #[test]
    fn metadata_roundtrip_preserves_expiry_and_scope() {
        let tokens = TokenSet::new(
            "access".to_string(),
            Some("refresh".to_string()),
            3600,
            Some("account".to_string()),
        );

        let metadata = encode_metadata(&tokens).unwrap();
        let decoded =
            decode_tokens("access".to_string(), Some("refresh".to_string()), Some(&metadata))
                .unwrap();

        assert_eq!(decoded.expires_in, 3600);
        assert_eq!(decoded.scope.as_deref(), Some("account"));
        assert_eq!(
            decoded.expires_at.map(|dt| dt.timestamp()),
            tokens.expires_at.map(|dt| dt.timestamp())
        );
    }

    #[test]
    fn missing_metadata_falls_back_to_bearer() {
        let decoded = decode_tokens("access".to_string(), None, None).unwrap();

        assert_eq!(decoded.token_type, "Bearer");
        assert!(decoded.expires_at.is_none());
        assert!(decoded.refresh_token.is_none());
    }

    #[test]
    fn corrupt_metadata_is_a_serialization_error() {
        let result = decode_tokens("access".to_string(), None, Some("{not json"));
        assert!(matches!(result, Err(KeychainError::Serialization(_))));
    }
}
