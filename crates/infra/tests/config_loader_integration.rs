//! Integration tests for configuration loader
//!
//! Loads configuration from files and builds a client from it.

use std::io::Write;
use std::time::Duration;

use afero_domain::{ClientConfig, DEFAULT_API_BASE_URL};
use afero_infra::api::{ApiClient, ApiError};
use afero_infra::config;
use tempfile::Builder;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new()
        .prefix("afero")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    file
}

#[test]
fn test_load_config_from_json_file_and_build_client() -> anyhow::Result<()> {
    let file = write_config(
        ".json",
        r#"{
            "api": {
                "base_url": "https://api.example.com",
                "app_id": "com.example.home",
                "platform": "linux",
                "timeout_seconds": 10,
                "user_agent": "example-home/2.0"
            },
            "oauth": {
                "client_id": "client-123",
                "client_secret": "secret-456"
            }
        }"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config.api.base_url, "https://api.example.com");
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.oauth.client_id, "client-123");
    assert_eq!(config.oauth.default_scope, "account");

    let client = ApiClient::from_config(&config)?;
    assert_eq!(client.config().base_url, "https://api.example.com");
    assert_eq!(client.config().user_agent.as_deref(), Some("example-home/2.0"));
    Ok(())
}

#[test]
fn test_load_config_from_toml_file() {
    let file = write_config(
        ".toml",
        r#"
[api]
base_url = "https://api.example.com"

[oauth]
client_id = "client-123"
default_scope = "account offline"
"#,
    );

    let config = config::load_from_file(Some(file.path().to_path_buf())).unwrap();

    assert_eq!(config.api.platform, "rust");
    assert_eq!(config.oauth.default_scope, "account offline");
    assert!(config.oauth.client_secret.is_none());
}

#[test]
fn test_invalid_json_is_config_error() {
    let file = write_config(".json", "{ \"api\": ");

    let result = config::load_from_file(Some(file.path().to_path_buf()));

    assert!(matches!(result, Err(ApiError::Config(_))));
}

#[test]
fn test_env_lookup_feeds_client() {
    let config = config::load_from_env_with(|key| match key {
        "AFERO_OAUTH_CLIENT_ID" => Some("client-123".to_string()),
        "AFERO_HTTP_TIMEOUT" => Some("3".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    let client = ApiClient::from_config(&config).unwrap();
    assert_eq!(client.config().timeout.as_secs(), 3);
}

#[test]
fn test_client_from_config_rejects_bad_settings() {
    let mut config = ClientConfig::default();
    config.oauth.client_id = "client-123".to_string();
    config.api.base_url = "not a url".to_string();
    assert!(matches!(ApiClient::from_config(&config), Err(ApiError::Config(_))));

    let no_client_id = ClientConfig::default();
    assert!(matches!(ApiClient::from_config(&no_client_id), Err(ApiError::Config(_))));
}

#[tokio::test]
async fn test_configured_timeout_applies_to_sign_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(serde_json::json!({ "access_token": "late" })),
        )
        .mount(&server)
        .await;

    let mut config = ClientConfig::default();
    config.api.base_url = server.uri();
    config.api.timeout_seconds = 1;
    config.oauth.client_id = "client-123".to_string();

    let client = ApiClient::from_config(&config).unwrap();
    let error = client.sign_in("jane@x.com", "pw", None).await.unwrap_err();

    assert!(matches!(error, ApiError::Network(_)), "{error:?}");
    assert!(!client.is_signed_in().await);
}
