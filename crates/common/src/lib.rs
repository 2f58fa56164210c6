//! Shared OAuth and platform utilities for the Afero client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - default: OAuth types, token endpoint client, session, keychain traits
//! - `platform`: platform keychain storage (`keyring`)
//! - `observability`: tracing subscriber bootstrap
//! - `test-utils`: in-memory mocks for keychain and OAuth client

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod security;

#[cfg(feature = "observability")]
pub mod observability;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{
    KeychainTrait, OAuthClient, OAuthClientError, OAuthClientTrait, OAuthConfig, OAuthSession,
    SessionError, TokenSet,
};
pub use security::KeychainError;
#[cfg(feature = "platform")]
pub use security::KeychainProvider;
