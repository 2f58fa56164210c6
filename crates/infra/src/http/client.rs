use std::time::Duration;

use afero_domain::{APP_HEADER, DEFAULT_HTTP_TIMEOUT_SECS};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::api::errors::ApiError;

/// Thin wrapper over a configured reqwest client.
///
/// Requests are sent exactly once; recovery from a rejected credential is
/// the job of the refresh wrapper above this layer.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, ApiError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder once.
    ///
    /// # Errors
    /// Returns [`ApiError::Network`] when no response was received
    /// (connect, timeout, TLS). HTTP error statuses are returned as `Ok`.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request =
            builder.build().map_err(|err| ApiError::EncodingFailure(err.to_string()))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(ApiError::Network(err.to_string()))
            }
        }
    }
}

/// Value of the `x-afero-app` header: `base64("<app_id>:<platform>")`.
#[must_use]
pub fn app_identity(app_id: &str, platform: &str) -> String {
    BASE64.encode(format!("{app_id}:{platform}"))
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: HeaderMap,
    app_identity: Option<(String, String)>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
            default_headers: HeaderMap::new(),
            app_identity: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request. Later calls extend earlier ones.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    /// Send `x-afero-app` with every request.
    pub fn app_identity(mut self, app_id: impl Into<String>, platform: impl Into<String>) -> Self {
        self.app_identity = Some((app_id.into(), platform.into()));
        self
    }

    /// # Errors
    /// Returns [`ApiError::Config`] for an app identity or user agent that is
    /// not a valid header value, or when reqwest cannot build the client.
    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut headers = self.default_headers;
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some((app_id, platform)) = &self.app_identity {
            let value = HeaderValue::from_str(&app_identity(app_id, platform))
                .map_err(|e| ApiError::Config(format!("Invalid app identity header: {e}")))?;
            headers.insert(APP_HEADER, value);
        }

        // gzip sets `Accept-Encoding: gzip` and decodes compressed bodies
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).gzip(true).default_headers(headers);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn app_identity_is_base64_of_id_and_platform() {
        assert_eq!(app_identity("io.afero.client", "rust"), "aW8uYWZlcm8uY2xpZW50OnJ1c3Q=");
    }

    #[tokio::test]
    async fn returns_server_error_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn sends_identity_and_gzip_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("x-afero-app", app_identity("app", "rust").as_str()))
            .and(header("accept-encoding", "gzip"))
            .and(header("user-agent", "afero-test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .app_identity("app", "rust")
            .user_agent("afero-test")
            .build()
            .expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let client = HttpClient::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("http client");

        let result = client.send(client.request(Method::GET, "http://127.0.0.1:9")).await;
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
