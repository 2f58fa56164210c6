//! Shared harness for the API integration tests
//!
//! An `ApiClient` pointed at a wiremock server, signed in with access token
//! `a1`. Refreshes go to `MockOAuthClient`, which hands out
//! `refreshed_access_token_1`, `_2`, ...

#![allow(dead_code)]

use std::sync::Arc;

use afero_common::auth::{OAuthSession, TokenSet};
use afero_common::testing::{MockKeychainProvider, MockOAuthClient};
use afero_infra::api::{ApiAuthService, ApiClient};
use wiremock::MockServer;

pub const INITIAL_TOKEN: &str = "a1";
pub const REFRESHED_TOKEN: &str = "refreshed_access_token_1";

pub type TestAuth = ApiAuthService<MockOAuthClient, MockKeychainProvider>;

pub struct Harness {
    pub server: MockServer,
    pub client: Arc<ApiClient>,
    pub auth: Arc<TestAuth>,
    pub oauth: MockOAuthClient,
}

impl Harness {
    /// Signed-in client against a fresh mock server.
    pub async fn new() -> Self {
        afero_common::observability::init_tracing("afero_infra=debug,warn", false);

        let server = MockServer::start().await;
        let oauth = MockOAuthClient::new();
        let session = OAuthSession::new(
            oauth.clone(),
            Arc::new(MockKeychainProvider::default()),
            "127.0.0.1",
        );
        let credential =
            TokenSet::new(INITIAL_TOKEN.to_string(), Some("r1".to_string()), 3600, None);
        session.set_credential(credential).await;
        let auth = Arc::new(ApiAuthService::new(Arc::new(session)));

        let client = ApiClient::builder()
            .base_url(server.uri())
            .auth(auth.clone())
            .build()
            .expect("api client should build");

        Self { server, client: Arc::new(client), auth, oauth }
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    /// Number of requests the mock API server has seen.
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.map_or(0, |requests| requests.len())
    }

    pub async fn access_token(&self) -> Option<String> {
        self.auth.session().access_token().await
    }
}
