//! Client configuration
//!
//! Typed view of the settings the SDK needs at startup. Loading lives in the
//! infrastructure crate; this module only defines the shape and defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_APP_ID, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OAUTH_SCOPE,
    DEFAULT_PLATFORM,
};

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiSettings,
    pub oauth: OAuthSettings,
}

/// REST API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Scheme and host of the API, e.g. `https://api.afero.io`
    pub base_url: String,
    /// Application identifier sent in the `x-afero-app` header
    pub app_id: String,
    pub platform: String,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

/// OAuth client credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: String,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<String>,
    #[serde(default = "default_scope")]
    pub default_scope: String,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self { client_id: String::new(), client_secret: None, default_scope: default_scope() }
    }
}

fn default_scope() -> String {
    DEFAULT_OAUTH_SCOPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "api": { "base_url": "https://api.example.com" },
            "oauth": { "client_id": "abc", "client_secret": "s3cret" }
        }"#;

        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.platform, DEFAULT_PLATFORM);
        assert_eq!(config.api.timeout_seconds, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.oauth.default_scope, "account");
        assert_eq!(config.oauth.client_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn client_secret_is_not_serialized() {
        let mut config = ClientConfig::default();
        config.oauth.client_secret = Some("hidden".to_string());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hidden"));
    }
}
