//! Protocol constants
//!
//! Centralized location for the device endpoints, header names and default
//! timings used by the session layer.

// Device endpoints, relative to the versioned API base URL

/// Challenge retrieval (`GET`)
pub const LOGIN_PATH: &str = "login/";
/// Session handshake (`POST`)
pub const SESSION_PATH: &str = "login/session/";
/// Authorization grant request and tracking
pub const AUTHORIZE_PATH: &str = "login/authorize/";
/// Session termination (`POST`)
pub const LOGOUT_PATH: &str = "login/logout/";

/// Header carrying the session token on authenticated requests
pub const SESSION_HEADER: &str = "x-fbx-app-auth";

/// Envelope error code for a request sent without a valid session
pub const ERROR_AUTH_REQUIRED: &str = "auth_required";
/// Envelope error code for an expired or revoked session token
pub const ERROR_INVALID_TOKEN: &str = "invalid_token";

/// Default per-request deadline, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Default lifetime of an idle pooled connection, in seconds
pub const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 600;
/// Default bound on idle pooled connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default window in which concurrent refreshes collapse into one
pub const DEFAULT_REFRESH_DEBOUNCE_MS: u64 = 5_000;

/// Default delay between two authorization status polls
pub const DEFAULT_GRANT_POLL_INTERVAL_MS: u64 = 10_000;
/// Default number of status polls before giving up on a pending grant
pub const DEFAULT_GRANT_MAX_ATTEMPTS: u32 = 30;

/// Application id used when none is configured
pub const DEFAULT_APP_ID: &str = "fr.freebox.exporter";
/// Application name shown on the device during authorization
pub const DEFAULT_APP_NAME: &str = "prometheus-exporter";
/// Client machine name reported during authorization
pub const DEFAULT_DEVICE_NAME: &str = "routerlink";
