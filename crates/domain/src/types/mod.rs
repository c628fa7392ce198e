//! Domain types and models
//!
//! Credentials, the API version descriptor contract, the authorization grant
//! status, and the persisted credential record.

pub mod api_version;
pub mod credential;
pub mod grant;
pub mod persisted;

pub use api_version::{ApiVersion, ApiVersionDescriptor};
pub use credential::{AppToken, Challenge, SessionCredential};
pub use grant::GrantStatus;
pub use persisted::PersistedConfig;
