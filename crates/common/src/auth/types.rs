//! OAuth 2.0 types and structures
//!
//! Defines the credential held by the session, the wire shape of token
//! endpoint responses, and the client configuration used to reach the token
//! endpoint of an Afero API host.

use std::fmt;

use afero_domain::{OAuthSettings, DEFAULT_OAUTH_SCOPE, OAUTH_TOKEN_PATH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 bearer credential
///
/// - Optional refresh token (a password grant may be issued without one)
/// - Both `expires_in` (duration) and `expires_at` (timestamp)
/// - Scope tracking for granted permissions
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token sent in the `Authorization` header
    pub access_token: String,

    /// Refresh token for obtaining new access tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for the Afero API)
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), derived from `expires_in`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` with calculated expiration time
    ///
    /// `expires_at` is only set for a positive `expires_in`.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + chrono::Duration::seconds(expires_in))
        } else {
            None
        };

        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Check if the access token is expired or will expire within the given
    /// threshold. A credential without an expiry never counts as expired.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                Utc::now() + chrono::Duration::seconds(threshold_seconds) >= expires_at
            }
            None => false,
        }
    }

    /// Whether a refresh-token grant is possible with this credential.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

// Tokens are secrets; keep them out of `{:?}` output and therefore out of logs.
impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut tokens = Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            response.scope,
        );
        tokens.token_type = response.token_type;
        tokens
    }
}

/// Token endpoint configuration
#[derive(Clone)]
pub struct OAuthConfig {
    /// Absolute URL of the token endpoint, e.g. `https://api.afero.io/oauth/token`
    pub token_url: String,

    /// OAuth client ID, sent as the HTTP basic auth user
    pub client_id: String,

    /// OAuth client secret, sent as the HTTP basic auth password
    pub client_secret: Option<String>,

    /// Scope requested by a password grant when the caller passes none
    pub default_scope: String,
}

impl OAuthConfig {
    /// Configuration for the token endpoint of the API at `base_url`.
    #[must_use]
    pub fn new(
        base_url: impl AsRef<str>,
        client_id: impl Into<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            token_url: format!("{}{}", base_url.as_ref().trim_end_matches('/'), OAUTH_TOKEN_PATH),
            client_id: client_id.into(),
            client_secret,
            default_scope: DEFAULT_OAUTH_SCOPE.to_string(),
        }
    }

    /// Build from loaded client settings.
    #[must_use]
    pub fn from_settings(base_url: impl AsRef<str>, settings: &OAuthSettings) -> Self {
        let mut config =
            Self::new(base_url, settings.client_id.clone(), settings.client_secret.clone());
        if !settings.default_scope.is_empty() {
            config.default_scope = settings.default_scope.clone();
        }
        config
    }

    #[must_use]
    pub fn with_default_scope(mut self, scope: impl Into<String>) -> Self {
        self.default_scope = scope.into();
        self
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("default_scope", &self.default_scope)
            .finish()
    }
}

/// OAuth error response from the token endpoint (RFC 6749 §5.2)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
