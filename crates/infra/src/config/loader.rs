//! Configuration loader
//!
//! Loads [`ClientConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `ROUTERLINK_REQUEST_TIMEOUT` is unset, falls back to loading from file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ROUTERLINK_REQUEST_TIMEOUT`: Per-request deadline in seconds (required)
//! - `ROUTERLINK_REFRESH_DEBOUNCE_MS`: Session refresh debounce in milliseconds
//! - `ROUTERLINK_GRANT_POLL_INTERVAL_MS`: Authorization poll interval in
//!   milliseconds
//! - `ROUTERLINK_GRANT_MAX_ATTEMPTS`: Authorization poll bound
//! - `ROUTERLINK_APP_ID`: Application id presented to the device
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./routerlink.json` or `./routerlink.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use routerlink_domain::{ClientConfig, Result, RouterLinkError};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["routerlink.json", "routerlink.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `RouterLinkError::Config` if configuration cannot be loaded from
/// either source or fails validation.
pub fn load() -> Result<ClientConfig> {
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

/// Load configuration from environment variables
///
/// # Errors
/// Returns `RouterLinkError::Config` if `ROUTERLINK_REQUEST_TIMEOUT` is
/// missing or any variable has an invalid value.
pub fn load_from_env() -> Result<ClientConfig> {
    let timeout = env_var("ROUTERLINK_REQUEST_TIMEOUT")?;
    let mut config = ClientConfig {
        request_timeout_seconds: parse_var("ROUTERLINK_REQUEST_TIMEOUT", &timeout)?,
        ..ClientConfig::default()
    };

    if let Some(value) = optional_var("ROUTERLINK_REFRESH_DEBOUNCE_MS") {
        config.refresh_debounce_millis = parse_var("ROUTERLINK_REFRESH_DEBOUNCE_MS", &value)?;
    }
    if let Some(value) = optional_var("ROUTERLINK_GRANT_POLL_INTERVAL_MS") {
        config.grant_poll_interval_millis =
            parse_var("ROUTERLINK_GRANT_POLL_INTERVAL_MS", &value)?;
    }
    if let Some(value) = optional_var("ROUTERLINK_GRANT_MAX_ATTEMPTS") {
        config.grant_max_attempts = parse_var("ROUTERLINK_GRANT_MAX_ATTEMPTS", &value)?;
    }
    if let Some(app_id) = optional_var("ROUTERLINK_APP_ID") {
        config.app.app_id = app_id;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `RouterLinkError::Config` if no file is found, the format is
/// invalid, or the values fail validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RouterLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            RouterLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RouterLinkError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RouterLinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RouterLinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RouterLinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        RouterLinkError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| RouterLinkError::Config(format!("Invalid value for {}: {}", key, e)))
}
