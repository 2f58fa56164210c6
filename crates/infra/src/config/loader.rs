//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `AFERO_OAUTH_CLIENT_ID`: OAuth client id (required)
//! - `AFERO_OAUTH_CLIENT_SECRET`: OAuth client secret
//! - `AFERO_OAUTH_SCOPE`: Scope requested at sign-in (default `account`)
//! - `AFERO_API_BASE_URL`: API scheme and host (default `https://api.afero.io`)
//! - `AFERO_APP_ID`: Application id sent in `x-afero-app`
//! - `AFERO_PLATFORM`: Platform sent in `x-afero-app` (default `rust`)
//! - `AFERO_HTTP_TIMEOUT`: Request timeout in seconds (default 30)
//! - `AFERO_USER_AGENT`: User agent override
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./afero.json` or `./afero.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use afero_domain::{ApiSettings, ClientConfig, OAuthSettings};

use crate::api::ApiError;

const FILE_STEMS: [&str; 2] = ["afero", "config"];
const FILE_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ApiError::Config` if configuration cannot be loaded from either
/// source or the file is invalid.
pub fn load() -> Result<ClientConfig, ApiError> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from the process environment
///
/// # Errors
/// Returns `ApiError::Config` if `AFERO_OAUTH_CLIENT_ID` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<ClientConfig, ApiError> {
    load_from_env_with(|key| std::env::var(key).ok())
}

/// Load configuration from variables returned by `lookup`
///
/// Unset optional variables take the defaults of [`ClientConfig`].
///
/// # Errors
/// Same as [`load_from_env`].
pub fn load_from_env_with<F>(lookup: F) -> Result<ClientConfig, ApiError>
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = lookup("AFERO_OAUTH_CLIENT_ID")
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            ApiError::Config(
                "Missing required environment variable: AFERO_OAUTH_CLIENT_ID".to_string(),
            )
        })?;

    let defaults = ApiSettings::default();
    let timeout_seconds = match lookup("AFERO_HTTP_TIMEOUT") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ApiError::Config(format!("Invalid AFERO_HTTP_TIMEOUT: {e}")))?,
        None => defaults.timeout_seconds,
    };

    let oauth_defaults = OAuthSettings::default();

    Ok(ClientConfig {
        api: ApiSettings {
            base_url: lookup("AFERO_API_BASE_URL").unwrap_or(defaults.base_url),
            app_id: lookup("AFERO_APP_ID").unwrap_or(defaults.app_id),
            platform: lookup("AFERO_PLATFORM").unwrap_or(defaults.platform),
            timeout_seconds,
            user_agent: lookup("AFERO_USER_AGENT"),
        },
        oauth: OAuthSettings {
            client_id,
            client_secret: lookup("AFERO_OAUTH_CLIENT_SECRET"),
            default_scope: lookup("AFERO_OAUTH_SCOPE").unwrap_or(oauth_defaults.default_scope),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ApiError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The OAuth client id is empty
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig, ApiError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ApiError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ApiError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ApiError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    if config.oauth.client_id.trim().is_empty() {
        return Err(ApiError::Config(format!(
            "{} does not set oauth.client_id",
            config_path.display()
        )));
    }
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`, JSON when the
/// path has none).
///
/// # Errors
/// Returns `ApiError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig, ApiError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ApiError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ApiError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current directory, its parent and grandparent, then the
/// same three levels relative to the executable. Within a directory
/// `afero.*` is preferred over `config.*` and JSON over TOML.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots.iter().flat_map(|root| candidates_in(root)).find(|path| path.exists())
}

/// Candidate files under `root` and up to two parent levels, in probe order.
fn candidates_in(root: &Path) -> Vec<PathBuf> {
    root.ancestors()
        .take(3)
        .flat_map(|dir| {
            FILE_STEMS.iter().flat_map(move |stem| {
                FILE_EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
            })
        })
        .collect()
}
