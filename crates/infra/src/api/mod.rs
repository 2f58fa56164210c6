//! Afero cloud API client
//!
//! Layers, outermost first:
//!
//! - [`ApiClient`]: typed endpoint groups ([`endpoints`])
//! - [`RetryingTransport`]: one credential refresh and one retry on 401
//! - [`ReqwestTransport`]: one HTTP exchange, bearer token read per request
//! - [`response`]: typed views of the returned JSON
//!
//! Credentials come from an [`AuthSession`], normally [`ApiAuthService`]
//! over `afero_common::auth::OAuthSession`.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod errors;
pub mod response;
pub mod retry;
pub mod transport;

pub use auth::{api_host, ApiAuthService, AuthSession};
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use retry::{with_oauth_refresh, RetryingTransport};
pub use transport::{
    build_path, encode_segment, EndpointRequest, HttpTransport, ReqwestTransport,
};
