//! Configuration loading
//!
//! Loads [`routerlink_domain::ClientConfig`] from environment variables or
//! files.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, find_config_file};
