//! HTTP transport for the device API
//!
//! Every response is wrapped in the device envelope
//! `{ success, msg, error_code, result }`; [`HttpClient`] unwraps it and
//! classifies failures into [`routerlink_domain::RouterLinkError`] variants.

pub mod client;
mod redact;

pub use client::{HttpClient, HttpClientBuilder, RequestDecorator};
pub use redact::redact_body;
