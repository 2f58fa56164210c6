//! OAuth session: the one bearer credential an API client works with
//!
//! The session owns the credential lifecycle:
//! - Sign-in with the password grant
//! - Refresh with the refresh-token grant (coalesced across callers)
//! - Sign-out, which only touches local state
//! - Persistence in the keychain under the API host name
//!
//! Request code never caches the token. It reads [`OAuthSession::access_token`]
//! when it builds each request, so a refresh is visible to the very next call.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::client::OAuthClientError;
use super::traits::{KeychainTrait, OAuthClientTrait};
use super::types::TokenSet;

/// Error type for session operations
#[derive(Debug)]
pub enum SessionError {
    /// Token endpoint failure, unchanged from the OAuth client
    OAuth(OAuthClientError),

    /// No credential is held (never signed in, or signed out)
    NotAuthenticated,

    /// The credential cannot be refreshed because it has no refresh token
    NoRefreshToken,
}

impl SessionError {
    /// HTTP status returned by the token endpoint, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::OAuth(e) => e.status(),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuth(e) => write!(f, "OAuth error: {e}"),
            Self::NotAuthenticated => write!(f, "Not authenticated (no credential)"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OAuth(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OAuthClientError> for SessionError {
    fn from(err: OAuthClientError) -> Self {
        Self::OAuth(err)
    }
}

enum RefreshPlan {
    AlreadyRefreshed,
    Refresh(String),
    NotAuthenticated,
    NoRefreshToken,
}

/// Credential holder for one API host
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct OAuthSession<C: OAuthClientTrait + 'static, K: KeychainTrait + 'static> {
    oauth_client: Arc<C>,
    keychain: Arc<K>,
    account_name: String,
    current_tokens: Arc<RwLock<Option<TokenSet>>>,
    refresh_gate: Mutex<()>,
}

impl<C: OAuthClientTrait + 'static, K: KeychainTrait + 'static> OAuthSession<C, K> {
    /// Create a signed-out session
    ///
    /// # Arguments
    /// * `oauth_client` - Token endpoint client
    /// * `keychain` - Credential storage
    /// * `account_name` - Keychain account, the API host name (e.g. `api.afero.io`)
    #[must_use]
    pub fn new(oauth_client: C, keychain: Arc<K>, account_name: impl Into<String>) -> Self {
        Self {
            oauth_client: Arc::new(oauth_client),
            keychain,
            account_name: account_name.into(),
            current_tokens: Arc::new(RwLock::new(None)),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Keychain account the credential is stored under.
    #[must_use]
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Load a previously persisted credential from the keychain.
    ///
    /// Returns `Ok(true)` when a credential was found. A missing or
    /// unreadable entry leaves the session signed out and returns
    /// `Ok(false)`.
    ///
    /// # Errors
    /// Currently infallible; the `Result` leaves room for storage backends
    /// that distinguish corruption from absence.
    pub async fn initialize(&self) -> Result<bool, SessionError> {
        match self.keychain.retrieve_tokens(&self.account_name).await {
            Ok(tokens) => {
                *self.current_tokens.write().await = Some(tokens);
                info!(account = %self.account_name, "Session restored from keychain");
                Ok(true)
            }
            Err(e) => {
                debug!(account = %self.account_name, error = %e, "No stored credential");
                Ok(false)
            }
        }
    }

    /// Sign in with the password grant.
    ///
    /// On success the credential is persisted and becomes current. On
    /// failure the token endpoint error is returned unchanged and the
    /// session state is not touched.
    ///
    /// # Errors
    /// Returns [`SessionError::OAuth`] if the grant fails.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<(), SessionError> {
        let tokens = self.oauth_client.password_grant(username, password, scope).await?;
        self.set_credential(tokens).await;

        info!(account = %self.account_name, "Signed in");
        Ok(())
    }

    /// Replace the current credential.
    ///
    /// The keychain is written first; a storage failure is logged and the
    /// credential is still kept in memory for the lifetime of the session.
    pub async fn set_credential(&self, tokens: TokenSet) {
        if let Err(e) = self.keychain.store_tokens(&self.account_name, &tokens).await {
            warn!(account = %self.account_name, error = %e, "Failed to persist credential");
        }
        *self.current_tokens.write().await = Some(tokens);
    }

    /// Snapshot of the current credential.
    pub async fn current_credential(&self) -> Option<TokenSet> {
        self.current_tokens.read().await.clone()
    }

    /// Current access token, read at request build time.
    pub async fn access_token(&self) -> Option<String> {
        self.current_tokens.read().await.as_ref().map(|t| t.access_token.clone())
    }

    /// Check if a credential is held
    pub async fn is_authenticated(&self) -> bool {
        self.current_tokens.read().await.is_some()
    }

    /// Forget the in-memory credential without touching the keychain.
    pub async fn clear(&self) {
        *self.current_tokens.write().await = None;
    }

    /// Sign out locally.
    ///
    /// Clears the in-memory credential and deletes the persisted one. The
    /// server is never contacted. Keychain failures are logged, not
    /// returned, so sign-out always succeeds and is idempotent.
    pub async fn sign_out(&self) {
        self.clear().await;

        if let Err(e) = self.keychain.delete_tokens(&self.account_name).await {
            warn!(account = %self.account_name, error = %e, "Failed to delete stored credential");
        }

        info!(account = %self.account_name, "Signed out");
    }

    /// Refresh the access token with the stored refresh token.
    ///
    /// `stale_access_token` is the token the caller saw rejected. Refreshes
    /// are serialised; when a caller gets its turn and the current token no
    /// longer matches the stale one, another caller already refreshed and
    /// this call returns `Ok(())` without a network round trip. Pass `None`
    /// to force a refresh.
    ///
    /// A refresh response without a refresh token keeps the previous one.
    ///
    /// # Errors
    /// - [`SessionError::NotAuthenticated`] when no credential is held
    /// - [`SessionError::NoRefreshToken`] when the credential cannot be refreshed
    /// - [`SessionError::OAuth`] when the token endpoint fails
    ///
    /// The session is signed out before any of these is returned.
    pub async fn refresh(&self, stale_access_token: Option<&str>) -> Result<(), SessionError> {
        let _gate = self.refresh_gate.lock().await;

        let plan = {
            let tokens = self.current_tokens.read().await;
            match tokens.as_ref() {
                None => RefreshPlan::NotAuthenticated,
                Some(current)
                    if stale_access_token.is_some_and(|stale| stale != current.access_token) =>
                {
                    RefreshPlan::AlreadyRefreshed
                }
                Some(current) => match current.refresh_token.as_deref() {
                    Some(refresh) if !refresh.is_empty() => {
                        RefreshPlan::Refresh(refresh.to_string())
                    }
                    _ => RefreshPlan::NoRefreshToken,
                },
            }
        };

        let refresh_token = match plan {
            RefreshPlan::AlreadyRefreshed => {
                debug!(
                    account = %self.account_name,
                    "Credential already refreshed by another caller"
                );
                return Ok(());
            }
            RefreshPlan::NotAuthenticated => {
                debug!(account = %self.account_name, "Refresh requested without a credential");
                return Err(SessionError::NotAuthenticated);
            }
            RefreshPlan::NoRefreshToken => {
                warn!(account = %self.account_name, "Credential has no refresh token; signing out");
                self.sign_out().await;
                return Err(SessionError::NoRefreshToken);
            }
            RefreshPlan::Refresh(token) => token,
        };

        match self.oauth_client.refresh_access_token(&refresh_token).await {
            Ok(mut tokens) => {
                if tokens.refresh_token.is_none() {
                    tokens.refresh_token = Some(refresh_token);
                }
                self.set_credential(tokens).await;
                info!(account = %self.account_name, "Access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(
                    account = %self.account_name,
                    error = %e,
                    "Token refresh failed; signing out"
                );
                self.sign_out().await;
                Err(SessionError::OAuth(e))
            }
        }
    }
}
