//! Error types used throughout the session layer
//!
//! Every failure a caller can observe is a [`RouterLinkError`]. Variants
//! produced by the transport carry the HTTP method and URL so that higher
//! layers can log and alert without re-deriving the request.

use thiserror::Error;

/// Categories of errors, used to pick a recovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Session rejected by the device - recoverable with a refresh
    Authentication,
    /// Device-reported business error - not recoverable here
    Api,
    /// Network, TLS or timeout failure
    Transport,
    /// Response did not match the expected envelope or payload shape
    Protocol,
    /// Invalid persisted state or settings - permanent
    Config,
    /// Authorization grant refused or never approved
    Grant,
}

/// Main error type for RouterLink
#[derive(Error, Debug)]
pub enum RouterLinkError {
    /// The exchange failed below HTTP, or timed out
    #[error("{method} {url}: transport error: {message}")]
    Transport { method: String, url: String, message: String },

    /// The body was not a `{success, result, error_code, msg}` envelope
    #[error("{method} {url}: malformed response envelope: {message}")]
    EnvelopeParse { method: String, url: String, message: String },

    /// The envelope succeeded but `result` did not match the expected type
    #[error("{method} {url}: cannot decode result: {message}")]
    Decode { method: String, url: String, message: String },

    /// The device requires a session for this endpoint
    #[error("{method} {url}: auth_required")]
    AuthRequired { method: String, url: String },

    /// The session token was expired or revoked
    #[error("{method} {url}: invalid_token")]
    InvalidToken { method: String, url: String },

    /// Any other error code reported by the device
    #[error("{method} {url} error_code={code} msg={message}")]
    Api { method: String, url: String, code: String, message: String },

    /// A persisted or caller-supplied value is unusable
    #[error("invalid {field}: {reason}")]
    ConfigValidation { field: &'static str, reason: String },

    /// The grant ended in a non-granted terminal status
    #[error("authorization grant failed: access is {status}")]
    GrantDenied { status: String },

    /// The grant was still pending when the poll budget ran out
    #[error("authorization grant still pending after {attempts} attempts")]
    GrantTimeout { attempts: u32 },

    /// An API version string is not of the form `<major>.<minor>`
    #[error("invalid api version: {0}")]
    InvalidApiVersion(String),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request body or persisted document could not be encoded or stored
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RouterLinkError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthRequired { .. } | Self::InvalidToken { .. } => ErrorCategory::Authentication,
            Self::Api { .. } => ErrorCategory::Api,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::EnvelopeParse { .. } | Self::Decode { .. } | Self::Serialization(_) => {
                ErrorCategory::Protocol
            }
            Self::ConfigValidation { .. } | Self::InvalidApiVersion(_) | Self::Config(_) => {
                ErrorCategory::Config
            }
            Self::GrantDenied { .. } | Self::GrantTimeout { .. } => ErrorCategory::Grant,
        }
    }

    /// Whether a session refresh followed by one retry may cure this error
    pub fn is_auth(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }
}

/// Result type alias for RouterLink operations
pub type Result<T> = std::result::Result<T, RouterLinkError>;
