//! Mock implementations of the session's storage and token endpoint traits

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{KeychainTrait, OAuthClientError, OAuthClientTrait, OAuthError, TokenSet};

/// In-memory keychain keyed by account name.
#[derive(Debug, Clone)]
pub struct MockKeychainProvider {
    storage: Arc<Mutex<HashMap<String, TokenSet>>>,
    fail_writes: Arc<AtomicBool>,
    service_name: String,
}

impl MockKeychainProvider {
    /// Create a new mock keychain provider with a service name for namespacing.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
            service_name: service_name.into(),
        }
    }

    /// Make `store_tokens` and `delete_tokens` fail, as a locked keychain would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Number of stored credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(format!("keychain {} is read-only", self.service_name))
        } else {
            Ok(())
        }
    }
}

impl Default for MockKeychainProvider {
    fn default() -> Self {
        Self::new("afero-test")
    }
}

#[async_trait]
impl KeychainTrait for MockKeychainProvider {
    async fn store_tokens(&self, account: &str, tokens: &TokenSet) -> Result<(), String> {
        self.check_writable()?;
        self.storage.lock().unwrap().insert(account.to_string(), tokens.clone());
        Ok(())
    }

    async fn retrieve_tokens(&self, account: &str) -> Result<TokenSet, String> {
        self.storage
            .lock()
            .unwrap()
            .get(account)
            .cloned()
            .ok_or_else(|| format!("no tokens stored for {account}"))
    }

    async fn delete_tokens(&self, account: &str) -> Result<(), String> {
        self.check_writable()?;
        self.storage.lock().unwrap().remove(account);
        Ok(())
    }

    async fn has_tokens(&self, account: &str) -> bool {
        self.storage.lock().unwrap().contains_key(account)
    }
}

#[derive(Debug, Default)]
struct MockOAuthState {
    grant_response: Mutex<Option<TokenSet>>,
    refresh_response: Mutex<Option<TokenSet>>,
    last_refresh_token: Mutex<Option<String>>,
    should_fail: AtomicBool,
    refresh_delay: Mutex<Option<Duration>>,
    password_grants: AtomicUsize,
    refreshes: AtomicUsize,
}

/// Mock token endpoint that counts grants without network calls.
///
/// Clones share state, so a test can keep a handle after moving the client
/// into a session.
#[derive(Clone, Debug, Default)]
pub struct MockOAuthClient {
    state: Arc<MockOAuthState>,
}

impl MockOAuthClient {
    /// Create a new mock OAuth client with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens returned by `password_grant`.
    #[must_use]
    pub fn with_grant(self, tokens: TokenSet) -> Self {
        *self.state.grant_response.lock().unwrap() = Some(tokens);
        self
    }

    /// Tokens returned by `refresh_access_token`.
    #[must_use]
    pub fn with_refresh(self, tokens: TokenSet) -> Self {
        *self.state.refresh_response.lock().unwrap() = Some(tokens);
        self
    }

    /// Make every grant fail with a 401 `invalid_grant` rejection.
    #[must_use]
    pub fn with_failure(self, should_fail: bool) -> Self {
        self.set_should_fail(should_fail);
        self
    }

    /// Delay each refresh, to widen race windows in concurrency tests.
    #[must_use]
    pub fn with_refresh_delay(self, delay: Duration) -> Self {
        *self.state.refresh_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn password_grant_count(&self) -> usize {
        self.state.password_grants.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.state.refreshes.load(Ordering::SeqCst)
    }

    /// Refresh token sent with the most recent refresh grant.
    #[must_use]
    pub fn last_refresh_token(&self) -> Option<String> {
        self.state.last_refresh_token.lock().unwrap().clone()
    }

    fn rejection() -> OAuthClientError {
        OAuthClientError::Rejected {
            status: 401,
            error: Some(OAuthError {
                error: "invalid_grant".to_string(),
                error_description: Some("mock rejection".to_string()),
            }),
            body: r#"{"error":"invalid_grant"}"#.to_string(),
        }
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    async fn password_grant(
        &self,
        _username: &str,
        _password: &str,
        scope: Option<&str>,
    ) -> Result<TokenSet, OAuthClientError> {
        self.state.password_grants.fetch_add(1, Ordering::SeqCst);

        if self.state.should_fail.load(Ordering::SeqCst) {
            return Err(Self::rejection());
        }

        let response = self.state.grant_response.lock().unwrap().clone();
        Ok(response.unwrap_or_else(|| {
            TokenSet::new(
                "mock_access_token".to_string(),
                Some("mock_refresh_token".to_string()),
                3600,
                Some(scope.unwrap_or("account").to_string()),
            )
        }))
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        let count = self.state.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.last_refresh_token.lock().unwrap() = Some(refresh_token.to_string());

        let delay = *self.state.refresh_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.state.should_fail.load(Ordering::SeqCst) {
            return Err(Self::rejection());
        }

        let response = self.state.refresh_response.lock().unwrap().clone();
        Ok(response.unwrap_or_else(|| {
            TokenSet::new(
                format!("refreshed_access_token_{count}"),
                Some("refreshed_refresh_token".to_string()),
                3600,
                None,
            )
        }))
    }
}
