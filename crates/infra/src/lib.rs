//! # RouterLink Infrastructure
//!
//! Authenticated session layer for the home-router HTTP API.
//!
//! This crate contains:
//! - The JSON envelope transport ([`http`])
//! - Authorization grant, session handshake and connection façade ([`api`])
//! - Configuration loading ([`config`])
//! - Logging setup ([`observability`])
//!
//! ## Architecture
//! - Depends on `routerlink-domain` for errors, settings and data types
//! - Contains all network I/O

pub mod api;
pub mod clock;
pub mod config;
pub mod http;
pub mod observability;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use api::{request_app_token, Connection, Session};
pub use clock::{Clock, MockClock, SystemClock};
pub use http::{HttpClient, RequestDecorator};
