//! Afero API client
//!
//! [`ApiClient`] composes the reqwest transport with the refresh-on-401
//! wrapper and exposes the typed endpoint groups defined under
//! [`super::endpoints`].

use std::sync::Arc;
use std::time::Duration;

use afero_domain::{
    ApiSettings, ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_APP_ID, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_PLATFORM,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::auth::{ApiAuthService, AuthSession};
use super::errors::ApiError;
use super::response;
use super::retry::RetryingTransport;
use super::transport::{EndpointRequest, HttpTransport, ReqwestTransport};
use crate::http::HttpClient;

/// Configuration for API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// Scheme and host of the API (e.g., "https://api.afero.io")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    pub app_id: String,
    pub platform: String,
    pub user_agent: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            app_id: DEFAULT_APP_ID.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            user_agent: None,
        }
    }
}

impl From<&ApiSettings> for ApiClientConfig {
    fn from(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout: Duration::from_secs(settings.timeout_seconds),
            app_id: settings.app_id.clone(),
            platform: settings.platform.clone(),
            user_agent: settings.user_agent.clone(),
        }
    }
}

/// Typed client for the Afero cloud REST API
///
/// Cheap to share behind an `Arc`. Every request reads the bearer token from
/// the session when it is built, and a 401 triggers one refresh and one
/// retry.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthSession>,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a client over reqwest.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ApiClientConfig, auth: Arc<dyn AuthSession>) -> Result<Self, ApiError> {
        let mut http = HttpClient::builder()
            .timeout(config.timeout)
            .app_identity(config.app_id.clone(), config.platform.clone());
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http.build()?;

        let transport = ReqwestTransport::new(http, config.base_url.clone(), Arc::clone(&auth));
        let transport = RetryingTransport::new(transport, Arc::clone(&auth));

        debug!(base_url = %config.base_url, "API client created");
        Ok(Self::with_transport(config, Arc::new(transport), auth))
    }

    /// Create a client over an arbitrary transport.
    ///
    /// The transport is used as given; wrap it in a
    /// [`RetryingTransport`] to get refresh-on-401.
    pub fn with_transport(
        config: ApiClientConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthSession>,
    ) -> Self {
        Self { transport, auth, config }
    }

    /// Create a client and a keychain-backed session from loaded
    /// configuration.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] for an invalid base URL, a missing OAuth
    /// client id, or an HTTP client that cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let auth = ApiAuthService::from_config(config)?;
        Self::new(ApiClientConfig::from(&config.api), Arc::new(auth))
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<dyn AuthSession> {
        &self.auth
    }

    /// Execute a request and return the raw transport result.
    ///
    /// # Errors
    /// Any [`ApiError`] from the transport stack.
    pub async fn execute(&self, request: &EndpointRequest) -> Result<Option<Value>, ApiError> {
        self.transport.execute(request).await
    }

    /// Execute a request and ignore the body, which need not be JSON.
    ///
    /// # Errors
    /// Any [`ApiError`] from the transport stack.
    pub async fn execute_unit(&self, request: &EndpointRequest) -> Result<(), ApiError> {
        let request = request.clone().discard_body();
        response::unit(self.execute(&request).await?)
    }

    /// Execute a request and return the body as raw JSON.
    ///
    /// # Errors
    /// Any [`ApiError`] from the transport stack.
    pub async fn execute_json(&self, request: &EndpointRequest) -> Result<Value, ApiError> {
        response::json(self.execute(request).await?)
    }

    /// Execute a request that must return one `T`.
    ///
    /// # Errors
    /// [`ApiError::UnexpectedResultType`] when the body is absent or not a
    /// `T`, otherwise any error from the transport stack.
    pub async fn execute_one<T: DeserializeOwned>(
        &self,
        request: &EndpointRequest,
    ) -> Result<T, ApiError> {
        response::one(self.execute(request).await?)
    }

    /// Execute a request that may return a `T`.
    ///
    /// # Errors
    /// [`ApiError::UnexpectedResultType`] when a body is present but not a
    /// `T`, otherwise any error from the transport stack.
    pub async fn execute_optional<T: DeserializeOwned>(
        &self,
        request: &EndpointRequest,
    ) -> Result<Option<T>, ApiError> {
        response::optional(self.execute(request).await?)
    }

    /// Execute a request that must return an array of `T`.
    ///
    /// # Errors
    /// [`ApiError::UnexpectedResultType`] when the body is absent or not an
    /// array of `T`, otherwise any error from the transport stack.
    pub async fn execute_many<T: DeserializeOwned>(
        &self,
        request: &EndpointRequest,
    ) -> Result<Vec<T>, ApiError> {
        response::many(self.execute(request).await?)
    }

    /// Sign in with the password grant. `scope` defaults to the configured
    /// OAuth scope.
    ///
    /// # Errors
    /// The token endpoint failure, e.g. [`ApiError::Http`] with status 401
    /// for bad credentials. The session is left unchanged.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        scope: Option<&str>,
    ) -> Result<(), ApiError> {
        self.auth.sign_in(username, password, scope).await?;
        info!("Signed in");
        Ok(())
    }

    /// Discard the credential. Never contacts the server.
    ///
    /// # Errors
    /// Does not fail for the built-in session.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.auth.sign_out_with(None).await
    }

    pub async fn is_signed_in(&self) -> bool {
        self.auth.is_signed_in().await
    }

    /// Load a persisted credential, if any.
    ///
    /// # Errors
    /// Any session error while reading persisted state.
    pub async fn restore_session(&self) -> Result<bool, ApiError> {
        self.auth.restore().await
    }
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ApiClientConfig,
    auth: Option<Arc<dyn AuthSession>>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn app_identity(mut self, app_id: impl Into<String>, platform: impl Into<String>) -> Self {
        self.config.app_id = app_id.into();
        self.config.platform = platform.into();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    pub fn auth(mut self, auth: Arc<dyn AuthSession>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// # Errors
    /// Returns [`ApiError::Config`] when no auth session was provided or the
    /// HTTP client cannot be built.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let auth =
            self.auth.ok_or_else(|| ApiError::Config("Auth provider not set".to_string()))?;
        ApiClient::new(self.config, auth)
    }
}

#[cfg(test)]
mod tests {
    use afero_common::auth::OAuthSession;
    use afero_common::testing::{MockKeychainProvider, MockOAuthClient};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn auth() -> Arc<dyn AuthSession> {
        let session = OAuthSession::new(
            MockOAuthClient::new(),
            Arc::new(MockKeychainProvider::default()),
            "127.0.0.1",
        );
        Arc::new(ApiAuthService::new(Arc::new(session)))
    }

    #[test]
    fn test_config_from_settings() {
        let settings = ApiSettings {
            base_url: "https://api.example.com".to_string(),
            app_id: "app".to_string(),
            platform: "linux".to_string(),
            timeout_seconds: 7,
            user_agent: Some("ua".to_string()),
        };

        let config = ApiClientConfig::from(&settings);

        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.platform, "linux");
        assert_eq!(ApiClientConfig::default().base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_builder_requires_auth() {
        let result = ApiClient::builder().base_url("https://api.example.com").build();
        assert!(matches!(result, Err(ApiError::Config(ref m)) if m.contains("Auth provider")));
    }

    #[tokio::test]
    async fn test_signed_in_client_sends_bearer_and_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ping"))
            .and(header("authorization", "Bearer mock_access_token"))
            .and(header("x-afero-app", crate::http::app_identity("app", "linux").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::builder()
            .base_url(server.uri())
            .app_identity("app", "linux")
            .auth(auth())
            .build()
            .unwrap();
        client.sign_in("jane@x.com", "pw", None).await.unwrap();
        assert!(client.is_signed_in().await);

        let body = client.execute_json(&EndpointRequest::get("/v1/ping")).await.unwrap();
        assert_eq!(body, json!({ "ok": true }));

        client.sign_out().await.unwrap();
        assert!(!client.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_sign_out_without_credential_succeeds() {
        let client = ApiClient::builder().auth(auth()).build().unwrap();

        assert_eq!(client.sign_out().await, Ok(()));
        assert!(!client.restore_session().await.unwrap());
    }
}
