//! Authenticated access to the device API
//!
//! # Architecture
//!
//! - [`authorize`]: one-time authorization grant producing an app token
//! - [`session`]: challenge-response handshake turning the app token into a
//!   session token, with debounced refresh
//! - [`connection`]: request façade that retries once after refreshing an
//!   expired session, and persists the app token

pub mod authorize;
pub mod connection;
pub mod session;

pub use authorize::request_app_token;
pub use connection::Connection;
pub use session::{compute_password, Session};
