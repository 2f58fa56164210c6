//! OAuth 2.0 token endpoint client
//!
//! Handles the two grants the Afero API accepts from first-party clients:
//! - Resource owner password grant (sign-in)
//! - Refresh token grant
//!
//! Both are form-encoded POSTs to `{base}/oauth/token` authenticated with the
//! OAuth client id/secret as HTTP basic credentials.

use std::time::Duration;

use afero_domain::DEFAULT_HTTP_TIMEOUT_SECS;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed before a response was received
    RequestFailed(reqwest::Error),

    /// Token endpoint answered with a non-success status
    Rejected { status: u16, error: Option<OAuthError>, body: String },

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl OAuthClientError {
    /// HTTP status of a rejected grant.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::Rejected { status, error: Some(error), .. } => {
                write!(f, "Token endpoint rejected grant ({status}): {error}")
            }
            Self::Rejected { status, body, .. } => {
                write!(f, "Token endpoint rejected grant ({status}): {body}")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestFailed(e) => Some(e),
            Self::Rejected { error: Some(error), .. } => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Token endpoint client
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a client with its own reqwest connection pool.
    ///
    /// # Examples
    /// ```
    /// use afero_common::auth::{OAuthClient, OAuthConfig};
    ///
    /// let config = OAuthConfig::new("https://api.afero.io", "client_id", None);
    /// let client = OAuthClient::new(config).unwrap();
    /// assert_eq!(client.config().token_url, "https://api.afero.io/oauth/token");
    /// ```
    ///
    /// # Errors
    /// Returns [`OAuthClientError::ConfigError`] if the client id is empty or
    /// the HTTP client cannot be built.
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthClientError> {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    /// Create a client whose token requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns [`OAuthClientError::ConfigError`] if the client id is empty or
    /// the HTTP client cannot be built.
    pub fn with_timeout(config: OAuthConfig, timeout: Duration) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthClientError::ConfigError(e.to_string()))?;
        Self::with_http_client(config, client)
    }

    /// Create a client sharing an existing reqwest client.
    ///
    /// # Errors
    /// Returns [`OAuthClientError::ConfigError`] if the client id is empty.
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Result<Self, OAuthClientError> {
        if config.client_id.trim().is_empty() {
            return Err(OAuthClientError::ConfigError("OAuth client id is empty".to_string()));
        }
        Ok(Self { config, client })
    }

    /// Exchange a username and password for a credential.
    ///
    /// `scope` falls back to the configured default scope (`account`).
    ///
    /// # Errors
    /// Returns [`OAuthClientError::Rejected`] for a non-success status (bad
    /// credentials are a 400/401 here), [`OAuthClientError::RequestFailed`]
    /// for transport failures, [`OAuthClientError::ParseError`] for an
    /// unreadable success body.
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError> {
        let scope = scope.unwrap_or(&self.config.default_scope);
        let params = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", scope),
        ];

        debug!(scope = %scope, "Requesting password grant");
        self.request_tokens(&params).await
    }

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns [`OAuthClientError::NoRefreshToken`] for an empty refresh
    /// token, otherwise the same failures as [`Self::password_grant`].
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        let params = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];

        debug!("Requesting refresh token grant");
        self.request_tokens(&params).await
    }

    async fn request_tokens(&self, params: &[(&str, &str)]) -> Result<TokenSet, OAuthClientError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, self.config.client_secret.as_deref())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<OAuthError>(&body).ok();
            debug!(status = status.as_u16(), "Token endpoint rejected grant");
            return Err(OAuthClientError::Rejected { status: status.as_u16(), error, body });
        }

        let token_response: TokenResponse =
            response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

        Ok(token_response.into())
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    async fn password_grant(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError> {
        self.password_grant(username, password, scope).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        self.refresh_access_token(refresh_token).await
    }
}
