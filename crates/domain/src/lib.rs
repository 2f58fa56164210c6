//! # Afero Domain
//!
//! Domain records exchanged with the Afero cloud REST API.
//!
//! This crate contains:
//! - Account, device, profile, rule, sharing, group and tag records
//! - Domain validation errors
//! - Client configuration records
//! - Wire constants shared by the client crates
//!
//! ## Architecture
//! - No dependencies on other Afero crates
//! - No I/O; every type is plain serde data

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
