//! Configuration structures
//!
//! Settings for the transport, session refresh and authorization grant.
//! Loading from environment or files lives in `routerlink-infra`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_ID, DEFAULT_APP_NAME, DEFAULT_DEVICE_NAME, DEFAULT_GRANT_MAX_ATTEMPTS,
    DEFAULT_GRANT_POLL_INTERVAL_MS, DEFAULT_POOL_IDLE_TIMEOUT_SECS,
    DEFAULT_POOL_MAX_IDLE_PER_HOST, DEFAULT_REFRESH_DEBOUNCE_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::errors::{Result, RouterLinkError};

/// Static identity presented to the device when requesting authorization
///
/// `app_id` is also sent with every session handshake and must match the id
/// the app token was granted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    /// Reverse-DNS application id, unique per device
    pub app_id: String,
    /// Name shown on the device front panel during authorization
    pub app_name: String,
    pub app_version: String,
    /// Name of the machine running the client
    pub device_name: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall deadline for one HTTP exchange, body included
    pub request_timeout_seconds: u64,
    /// How long an idle pooled connection is kept open
    pub pool_idle_timeout_seconds: u64,
    /// Upper bound on idle pooled connections per host
    pub pool_max_idle_per_host: usize,
    /// Refreshes closer together than this collapse into the earlier one
    pub refresh_debounce_millis: u64,
    /// Delay between two polls of a pending authorization grant
    pub grant_poll_interval_millis: u64,
    /// Number of polls after which a pending grant times out
    pub grant_max_attempts: u32,
    /// Overrides the transport's default `User-Agent` header
    pub user_agent: Option<String>,
    /// Identity presented when requesting authorization
    pub app: AppIdentity,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            pool_idle_timeout_seconds: DEFAULT_POOL_IDLE_TIMEOUT_SECS,
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            refresh_debounce_millis: DEFAULT_REFRESH_DEBOUNCE_MS,
            grant_poll_interval_millis: DEFAULT_GRANT_POLL_INTERVAL_MS,
            grant_max_attempts: DEFAULT_GRANT_MAX_ATTEMPTS,
            user_agent: None,
            app: AppIdentity::default(),
        }
    }
}

impl ClientConfig {
    /// Per-request deadline as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }

    /// Debounce window applied to session refreshes
    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_millis)
    }

    /// Delay between two authorization status polls
    pub fn grant_poll_interval(&self) -> Duration {
        Duration::from_millis(self.grant_poll_interval_millis)
    }

    /// Reject settings that would make a bound disappear
    ///
    /// # Errors
    /// Returns `RouterLinkError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_seconds == 0 {
            return Err(RouterLinkError::Config("request timeout must be positive".into()));
        }
        if self.grant_poll_interval_millis == 0 {
            return Err(RouterLinkError::Config("grant poll interval must be positive".into()));
        }
        if self.grant_max_attempts == 0 {
            return Err(RouterLinkError::Config("grant max attempts must be at least 1".into()));
        }
        if self.app.app_id.trim().is_empty() {
            return Err(RouterLinkError::Config("app id must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_expectations() {
        let config = ClientConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.pool_idle_timeout(), Duration::from_secs(600));
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.refresh_debounce(), Duration::from_secs(5));
        assert_eq!(config.app.app_id, "fr.freebox.exporter");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"request_timeout_seconds": 3}"#).unwrap();
        assert_eq!(config.request_timeout_seconds, 3);
        assert_eq!(config.grant_max_attempts, DEFAULT_GRANT_MAX_ATTEMPTS);
        assert_eq!(config.app, AppIdentity::default());
    }

    #[test]
    fn short_poll_interval_without_debounce_is_valid() {
        let config = ClientConfig {
            refresh_debounce_millis: 0,
            grant_poll_interval_millis: 5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.grant_poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let config = ClientConfig { request_timeout_seconds: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(RouterLinkError::Config(_))));

        let config = ClientConfig { grant_max_attempts: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = ClientConfig { grant_poll_interval_millis: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.app.app_id = " ".into();
        assert!(config.validate().is_err());
    }
}
