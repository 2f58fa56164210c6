//! Wire constants
//!
//! Centralized location for values shared by the session and transport
//! layers.

// Service defaults
pub const DEFAULT_API_BASE_URL: &str = "https://api.afero.io";
pub const DEFAULT_APP_ID: &str = "io.afero.client";
pub const DEFAULT_PLATFORM: &str = "rust";
pub const DEFAULT_OAUTH_SCOPE: &str = "account";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// OAuth
pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";
pub const KEYCHAIN_SERVICE_NAME: &str = "io.afero.oauth";

// Headers
pub const APP_HEADER: &str = "x-afero-app";

// Query parameters
pub const EXPANSIONS_PARAM: &str = "expansions";
