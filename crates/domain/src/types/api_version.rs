//! API version descriptor
//!
//! The descriptor is produced by device discovery and tells the session layer
//! where the versioned API lives. Discovery itself is not part of this crate;
//! the session layer only needs the [`ApiVersionDescriptor`] contract.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Result, RouterLinkError};

/// Version-aware URL builder for the device API
///
/// Implementations are persisted alongside the app token, hence the serde
/// bounds.
pub trait ApiVersionDescriptor:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Resolve a path relative to the versioned API root
    ///
    /// # Errors
    /// Returns `RouterLinkError::InvalidApiVersion` when the descriptor cannot
    /// produce a URL. Callers treat this as permanent.
    fn url(&self, path: &str) -> Result<Url>;

    /// Whether the descriptor carries everything needed to build URLs
    fn is_valid(&self) -> bool;

    /// Pin the API version used in URLs; `0` selects the latest supported one
    ///
    /// # Errors
    /// Returns `RouterLinkError::InvalidApiVersion` when `forced` exceeds what
    /// the device supports or the device version cannot be parsed.
    fn set_query_api_version(&mut self, forced: u32) -> Result<()>;
}

/// Descriptor as returned by the device `api_version` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVersion {
    #[serde(default)]
    pub api_domain: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub https_available: bool,
    #[serde(default)]
    pub https_port: u16,
    #[serde(default)]
    pub device_name: String,
    /// Latest API version supported by the device, e.g. `"8.0"`
    #[serde(default)]
    pub api_version: String,
    /// API root path, e.g. `"/api/"`
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default)]
    pub device_type: String,
    #[serde(skip)]
    query_api_version: u32,
}

impl ApiVersion {
    /// Major version advertised by the device
    ///
    /// # Errors
    /// Returns `RouterLinkError::InvalidApiVersion` if `api_version` is not of
    /// the form `<major>[.<minor>]`.
    pub fn max_version(&self) -> Result<u32> {
        let major = self.api_version.split('.').next().unwrap_or_default();
        major.trim().parse::<u32>().map_err(|e| {
            RouterLinkError::InvalidApiVersion(format!(
                "cannot parse api_version {:?}: {}",
                self.api_version, e
            ))
        })
    }

    /// Version used when building URLs
    pub fn query_api_version(&self) -> u32 {
        self.query_api_version
    }
}

impl ApiVersionDescriptor for ApiVersion {
    fn url(&self, path: &str) -> Result<Url> {
        if !self.is_valid() {
            return Err(RouterLinkError::InvalidApiVersion(format!(
                "incomplete descriptor for device {:?}",
                self.device_name
            )));
        }

        let version = match self.query_api_version {
            0 => self.max_version()?,
            v => v,
        };

        let raw = format!(
            "https://{}:{}/{}/v{}/{}",
            self.api_domain,
            self.https_port,
            self.api_base_url.trim_matches('/'),
            version,
            path.trim_start_matches('/')
        );

        Url::parse(&raw).map_err(|e| {
            RouterLinkError::InvalidApiVersion(format!("cannot build URL {raw}: {e}"))
        })
    }

    fn is_valid(&self) -> bool {
        !self.api_domain.is_empty()
            && !self.uid.is_empty()
            && self.https_available
            && self.https_port != 0
            && !self.device_name.is_empty()
            && !self.api_version.is_empty()
            && !self.api_base_url.is_empty()
            && !self.device_type.is_empty()
    }

    fn set_query_api_version(&mut self, forced: u32) -> Result<()> {
        let max = self.max_version()?;
        if forced > max {
            return Err(RouterLinkError::InvalidApiVersion(format!(
                "forced API version {forced} is above the device maximum {max}"
            )));
        }

        self.query_api_version = if forced == 0 { max } else { forced };
        Ok(())
    }
}
