//! Primitive request execution
//!
//! Every endpoint is a single [`EndpointRequest`] handed to an
//! [`HttpTransport`]. The transport returns the decoded JSON body, or `None`
//! for an absent or discarded body, and leaves typing to [`super::response`].

use std::sync::Arc;

use afero_domain::EXPANSIONS_PARAM;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::auth::AuthSession;
use super::errors::ApiError;
use crate::http::HttpClient;

/// One call to the REST API
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    pub expansions: Vec<String>,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Whether a 401 may trigger a credential refresh and one retry
    pub attempt_refresh: bool,
    /// Skip decoding a successful response body
    pub discard_body: bool,
}

impl EndpointRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            expansions: Vec::new(),
            params: Vec::new(),
            body: None,
            attempt_refresh: true,
            discard_body: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn expansions<I, S>(mut self, expansions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expansions.extend(expansions.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns [`ApiError::EncodingFailure`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::EncodingFailure(format!("request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn attempt_refresh(mut self, attempt_refresh: bool) -> Self {
        self.attempt_refresh = attempt_refresh;
        self
    }

    /// Ignore whatever a successful response carries, JSON or not.
    #[must_use]
    pub fn discard_body(mut self) -> Self {
        self.discard_body = true;
        self
    }

    /// Path with expansions and query parameters appended.
    pub fn relative_url(&self) -> String {
        build_path(&self.path, &self.expansions, &self.params)
    }
}

/// Append `expansions=a,b` and then `params` to `path`.
///
/// Keys and values are query-encoded. Each expansion name is encoded on its
/// own and the names are joined with a literal `,`. The first parameter is
/// joined with `?` unless `path` already carries a query.
pub fn build_path(path: &str, expansions: &[String], params: &[(String, String)]) -> String {
    let mut pairs = Vec::with_capacity(params.len() + 1);

    if !expansions.is_empty() {
        let names: Vec<_> = expansions.iter().map(|name| urlencoding::encode(name)).collect();
        pairs.push(format!("{EXPANSIONS_PARAM}={}", names.join(",")));
    }

    pairs.extend(params.iter().map(|(key, value)| {
        format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
    }));

    if pairs.is_empty() {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{}", pairs.join("&"))
}

/// Percent-encode caller input used as one path segment.
///
/// # Errors
/// Returns [`ApiError::EncodingFailure`] for an empty segment, which would
/// otherwise address the parent collection.
pub fn encode_segment(segment: &str) -> Result<String, ApiError> {
    if segment.is_empty() {
        return Err(ApiError::EncodingFailure("empty path segment".to_string()));
    }
    Ok(urlencoding::encode(segment).into_owned())
}

/// Executes one request and normalises the response body
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// `Ok(None)` means the server sent no body (204/205, empty, or `null`)
    /// or the request asked for the body to be discarded.
    async fn execute(&self, request: &EndpointRequest) -> Result<Option<Value>, ApiError>;
}

/// [`HttpTransport`] over reqwest
///
/// The bearer token is read from the session for every request, so a
/// refreshed credential is used by the very next call.
pub struct ReqwestTransport {
    http: HttpClient,
    base_url: String,
    auth: Arc<dyn AuthSession>,
}

impl ReqwestTransport {
    pub fn new(http: HttpClient, base_url: impl Into<String>, auth: Arc<dyn AuthSession>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, auth }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, request: &EndpointRequest) -> Result<url::Url, ApiError> {
        let raw = format!("{}{}", self.base_url, request.relative_url());
        url::Url::parse(&raw).map_err(|e| ApiError::EncodingFailure(format!("{raw}: {e}")))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: &EndpointRequest) -> Result<Option<Value>, ApiError> {
        let url = self.resolve(request)?;

        let mut builder = self.http.request(request.method.clone(), url.clone());
        if let Some(token) = self.auth.access_token().await {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: format!("{} {url} returned status {status}: {text}", request.method),
            });
        }

        if request.discard_body
            || status == StatusCode::NO_CONTENT
            || status == StatusCode::RESET_CONTENT
            || text.trim().is_empty()
        {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => {
                debug!(%status, "decoded response body");
                Ok(Some(value))
            }
            Err(e) => Err(ApiError::UnexpectedResultType(format!(
                "{} {url} returned a body that is not JSON: {e}",
                request.method
            ))),
        }
    }
}
