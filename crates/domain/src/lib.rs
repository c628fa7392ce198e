//! # RouterLink Domain
//!
//! Domain types for the authenticated session layer of the home-router API.
//!
//! This crate contains:
//! - Error types and the `Result` alias
//! - Client configuration structures
//! - Credential, grant and API version types
//! - Protocol constants
//!
//! ## Architecture
//! - No dependencies on other RouterLink crates
//! - No I/O beyond the caller-supplied streams of [`PersistedConfig`]

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
