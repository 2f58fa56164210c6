//! Traits for OAuth and keychain operations
//!
//! These traits abstract the external dependencies of the session (the token
//! endpoint and the system keychain) so it can be driven by mocks in tests.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::TokenSet;

/// Token endpoint operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Exchange a username and password for a credential
    ///
    /// # Arguments
    /// * `scope` - Requested scope; `None` uses the client's default scope
    ///
    /// # Errors
    /// Returns error if the grant is rejected, the request fails, or the
    /// response cannot be parsed
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError>;

    /// Refresh access token using refresh token
    ///
    /// # Returns
    /// New `TokenSet` with updated access token and possibly new refresh token
    ///
    /// # Errors
    /// Returns error if refresh fails or token is invalid/revoked
    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenSet, OAuthClientError>;
}

/// Credential storage
///
/// `account` is the storage key; the session uses the API host name so one
/// credential is kept per host.
#[async_trait]
pub trait KeychainTrait: Send + Sync {
    /// Store OAuth tokens
    ///
    /// # Errors
    /// Returns error if storage fails
    async fn store_tokens(&self, account: &str, tokens: &TokenSet) -> Result<(), String>;

    /// Retrieve OAuth tokens
    ///
    /// # Errors
    /// Returns error if tokens don't exist or retrieval fails
    async fn retrieve_tokens(&self, account: &str) -> Result<TokenSet, String>;

    /// Delete OAuth tokens. Deleting absent tokens is not an error.
    ///
    /// # Errors
    /// Returns error if deletion fails
    async fn delete_tokens(&self, account: &str) -> Result<(), String>;

    /// Check if OAuth tokens exist for the given account
    async fn has_tokens(&self, account: &str) -> bool;
}
