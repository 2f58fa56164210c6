//! API-specific error types
//!
//! Every facade call returns [`ApiError`]. HTTP failures keep their status
//! code so callers (and the refresh wrapper) can branch on it.

use afero_common::auth::{OAuthClientError, SessionError};
use afero_domain::DomainError;
use thiserror::Error;

/// Coarse grouping of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401/403 and missing or unusable credentials
    Authentication,
    /// 429
    RateLimit,
    /// 5xx and responses the client cannot make sense of
    Server,
    /// Other 4xx and requests rejected before they were sent
    Client,
    /// Network/connection errors
    Network,
    /// Configuration errors
    Config,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not have the requested shape
    #[error("Unexpected result type: {0}")]
    UnexpectedResultType(String),

    /// A refresh was attempted without a credential
    #[error("Not logged in")]
    NotLoggedIn,

    /// A path or URL could not be built from caller input
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    /// A precondition of the endpoint was violated; nothing was sent
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an HTTP 401. A 403 is not.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Get the error category for this error
    #[must_use]
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Http { status: 401 | 403, .. } => ApiErrorCategory::Authentication,
            Self::Http { status: 429, .. } => ApiErrorCategory::RateLimit,
            Self::Http { status, .. } if *status >= 500 => ApiErrorCategory::Server,
            Self::Http { .. } => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::UnexpectedResultType(_) => ApiErrorCategory::Server,
            Self::NotLoggedIn | Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::EncodingFailure(_) | Self::BadParameter(_) => ApiErrorCategory::Client,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl From<OAuthClientError> for ApiError {
    fn from(err: OAuthClientError) -> Self {
        match err {
            OAuthClientError::Rejected { status, error, body } => {
                let message = error.map_or(body, |oauth| oauth.to_string());
                Self::Http { status, message }
            }
            OAuthClientError::RequestFailed(e) => Self::Network(e.to_string()),
            OAuthClientError::ConfigError(msg) => Self::Config(msg),
            other @ (OAuthClientError::ParseError(_) | OAuthClientError::NoRefreshToken) => {
                Self::Auth(other.to_string())
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::OAuth(e) => e.into(),
            SessionError::NotAuthenticated => Self::NotLoggedIn,
            SessionError::NoRefreshToken => Self::Auth(err.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::BadParameter(err.to_string())
    }
}
