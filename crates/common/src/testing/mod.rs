//! Testing utilities
//!
//! In-memory stand-ins for the session's external dependencies:
//! - [`MockKeychainProvider`]: credential storage backed by a `HashMap`
//! - [`MockOAuthClient`]: token endpoint with scripted responses and call
//!   counters
//!
//! Available to downstream crates through the `test-utils` feature.

pub mod mocks;

pub use mocks::{MockKeychainProvider, MockOAuthClient};
