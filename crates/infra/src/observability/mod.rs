//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries embedding the session
//! layer call [`init_tracing`] once at startup to print them.

use routerlink_domain::{Result, RouterLinkError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, for log shippers
    Json,
}

/// Install a text subscriber filtered by `RUST_LOG`, or by
/// `default_directive` when `RUST_LOG` is unset
///
/// # Errors
/// Returns `RouterLinkError::Config` if the directive is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    init_tracing_with_format(default_directive, LogFormat::Text)
}

/// Same as [`init_tracing`] with an explicit output format
pub fn init_tracing_with_format(default_directive: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(default_directive)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
    };

    installed.map_err(|e| RouterLinkError::Config(format!("cannot install subscriber: {e}")))
}

fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            RouterLinkError::Config(format!("invalid log directive {default_directive:?}: {e}"))
        }),
    }
}
