//! OAuth 2.0 credential handling for the Afero REST API
//!
//! This module owns the bearer credential used by every API call: how it is
//! obtained (password grant), renewed (refresh-token grant), persisted
//! (platform keychain) and shared (one [`OAuthSession`] per API host).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  OAuthSession   │  Current credential + sign-in / refresh / sign-out
//! └────────┬────────┘
//!          │
//!          ├──► OAuthClientTrait   (token endpoint: password + refresh grants)
//!          │         └──► OAuthClient (reqwest implementation)
//!          │
//!          └──► KeychainTrait      (credential persistence, keyed by API host)
//!                    └──► KeychainProvider (platform keychain, `platform` feature)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use afero_common::auth::{OAuthClient, OAuthConfig, OAuthSession};
//! use afero_common::security::KeychainProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuthConfig::new("https://api.afero.io", "client_id", Some("secret".into()));
//!     let keychain = Arc::new(KeychainProvider::new("io.afero.oauth"));
//!     let session = OAuthSession::new(OAuthClient::new(config)?, keychain, "api.afero.io");
//!
//!     // Reuse a persisted credential if there is one
//!     if !session.initialize().await? {
//!         session.sign_in("jane@example.com", "password", None).await?;
//!     }
//!
//!     println!("signed in: {}", session.is_authenticated().await);
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenSet`, `TokenResponse`, `OAuthConfig`, `OAuthError`
//! - **[`client`]**: token endpoint client
//! - **[`session`]**: credential lifecycle, refresh coalescing
//! - **[`traits`]**: seams for the token endpoint and credential storage

pub mod client;
#[cfg(feature = "platform")]
mod keychain;
pub mod session;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use client::{OAuthClient, OAuthClientError};
pub use session::{OAuthSession, SessionError};
pub use traits::{KeychainTrait, OAuthClientTrait};
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
