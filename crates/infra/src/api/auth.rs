//! Session seam between the transport and the OAuth session
//!
//! The transport and the refresh wrapper only see [`AuthSession`], so tests
//! can count refreshes with a hand-written mock while production code runs
//! [`ApiAuthService`] over an `OAuthSession`.

use std::sync::Arc;
use std::time::Duration;

use afero_common::auth::{
    KeychainTrait, OAuthClient, OAuthClientTrait, OAuthConfig, OAuthSession,
};
use afero_common::security::KeychainProvider;
use afero_domain::{ClientConfig, KEYCHAIN_SERVICE_NAME};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::errors::ApiError;

/// Credential operations needed by the transport and the refresh wrapper
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// Access token to attach to the next request, if signed in.
    async fn access_token(&self) -> Option<String>;

    /// Refresh the credential.
    ///
    /// `stale` is the access token the failed call was sent with. On
    /// failure the session is signed out and `passthrough`, when given, is
    /// returned instead of the refresh error.
    async fn refresh(
        &self,
        stale: Option<&str>,
        passthrough: Option<ApiError>,
    ) -> Result<(), ApiError>;

    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<(), ApiError>;

    /// Clear local credential state, then complete with `error` if one is
    /// passed through.
    async fn sign_out_with(&self, error: Option<ApiError>) -> Result<(), ApiError>;

    async fn is_signed_in(&self) -> bool;

    /// Restore a persisted credential. Returns whether one was found.
    async fn restore(&self) -> Result<bool, ApiError> {
        Ok(false)
    }
}

/// [`AuthSession`] backed by an [`OAuthSession`]
pub struct ApiAuthService<
    C: OAuthClientTrait + 'static = OAuthClient,
    K: KeychainTrait + 'static = KeychainProvider,
> {
    session: Arc<OAuthSession<C, K>>,
}

impl<C: OAuthClientTrait + 'static, K: KeychainTrait + 'static> ApiAuthService<C, K> {
    pub fn new(session: Arc<OAuthSession<C, K>>) -> Self {
        Self { session }
    }

    /// The wrapped session, for callers that need `current_credential` or
    /// `set_credential`.
    pub fn session(&self) -> &Arc<OAuthSession<C, K>> {
        &self.session
    }
}

impl ApiAuthService {
    /// Session for the API host in `config`, persisted in the platform
    /// keychain under that host name.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the base URL has no host or the OAuth
    /// client id is missing.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let host = api_host(&config.api.base_url)?;
        let oauth_config = OAuthConfig::from_settings(&config.api.base_url, &config.oauth);
        let timeout = Duration::from_secs(config.api.timeout_seconds);
        let client = OAuthClient::with_timeout(oauth_config, timeout)?;
        let keychain = Arc::new(KeychainProvider::new(KEYCHAIN_SERVICE_NAME));

        debug!(host = %host, "Creating OAuth session");
        Ok(Self::new(Arc::new(OAuthSession::new(client, keychain, host))))
    }
}

/// Host name of the API, used as the keychain account.
///
/// # Errors
/// Returns [`ApiError::Config`] for an unparsable URL or one without a host.
pub fn api_host(base_url: &str) -> Result<String, ApiError> {
    let url = url::Url::parse(base_url)
        .map_err(|e| ApiError::Config(format!("Invalid API base URL {base_url}: {e}")))?;
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| ApiError::Config(format!("API base URL {base_url} has no host")))
}

#[async_trait]
impl<C: OAuthClientTrait + 'static, K: KeychainTrait + 'static> AuthSession
    for ApiAuthService<C, K>
{
    async fn access_token(&self) -> Option<String> {
        self.session.access_token().await
    }

    async fn refresh(
        &self,
        stale: Option<&str>,
        passthrough: Option<ApiError>,
    ) -> Result<(), ApiError> {
        match self.session.refresh(stale).await {
            Ok(()) => Ok(()),
            Err(e) => {
                let mapped = ApiError::from(e);
                warn!(error = %mapped, "Credential refresh failed");
                Err(passthrough.unwrap_or(mapped))
            }
        }
    }

    async fn sign_in(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<(), ApiError> {
        self.session.sign_in(username, password, scope).await.map_err(ApiError::from)
    }

    async fn sign_out_with(&self, error: Option<ApiError>) -> Result<(), ApiError> {
        self.session.sign_out().await;
        match error {
            Some(error) => {
                info!(error = %error, "Signed out after error");
                Err(error)
            }
            None => Ok(()),
        }
    }

    async fn is_signed_in(&self) -> bool {
        self.session.is_authenticated().await
    }

    async fn restore(&self) -> Result<bool, ApiError> {
        self.session.initialize().await.map_err(ApiError::from)
    }
}
