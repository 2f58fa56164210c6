//! # Afero Infrastructure
//!
//! I/O side of the Afero cloud client.
//!
//! This crate contains:
//! - HTTP client over reqwest
//! - Transport, refresh-on-401 wrapper and typed endpoint facade
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Records come from `afero-domain`
//! - OAuth session and keychain persistence come from `afero-common`

#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{ApiAuthService, ApiClient, ApiClientConfig, ApiError, AuthSession};
pub use http::{HttpClient, HttpClientBuilder};
