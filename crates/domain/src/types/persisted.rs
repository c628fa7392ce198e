//! Persisted credential record
//!
//! The only durable state: the API version descriptor and the app token.
//! Session credentials are device-bound and short-lived and never appear here.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::api_version::ApiVersionDescriptor;
use super::credential::AppToken;
use crate::errors::{Result, RouterLinkError};

/// On-disk document `{ "api": <descriptor>, "app_token": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedConfig<V> {
    pub api: Option<V>,
    #[serde(default)]
    pub app_token: AppToken,
}

impl<V: ApiVersionDescriptor> PersistedConfig<V> {
    pub fn new(api: V, app_token: AppToken) -> Self {
        Self { api: Some(api), app_token }
    }

    /// Decode a single JSON document from `reader`
    ///
    /// # Errors
    /// Returns `RouterLinkError::Serialization` if the stream is not a valid
    /// document. Field-level problems are reported by [`Self::validate`].
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| {
            RouterLinkError::Serialization(format!("cannot decode persisted config: {e}"))
        })
    }

    /// Encode as a single JSON document followed by a newline
    ///
    /// # Errors
    /// Returns `RouterLinkError::Serialization` on encoding or I/O failure.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer(&mut writer, self).map_err(|e| {
            RouterLinkError::Serialization(format!("cannot encode persisted config: {e}"))
        })?;
        writer
            .write_all(b"\n")
            .map_err(|e| RouterLinkError::Serialization(format!("cannot write config: {e}")))
    }

    /// Check the record and apply the forced API version
    ///
    /// Returns the descriptor pinned to the query version together with the
    /// app token.
    ///
    /// # Errors
    /// Returns `RouterLinkError::ConfigValidation` naming `api` or
    /// `app_token`.
    pub fn validate(self, forced_api_version: u32) -> Result<(V, AppToken)> {
        let mut api = self.api.ok_or(RouterLinkError::ConfigValidation {
            field: "api",
            reason: "missing api version descriptor".into(),
        })?;

        api.set_query_api_version(forced_api_version).map_err(|e| {
            RouterLinkError::ConfigValidation { field: "api", reason: e.to_string() }
        })?;

        if !api.is_valid() {
            return Err(RouterLinkError::ConfigValidation {
                field: "api",
                reason: format!("incomplete api version descriptor {api:?}"),
            });
        }

        if self.app_token.is_empty() {
            return Err(RouterLinkError::ConfigValidation {
                field: "app_token",
                reason: "must not be empty".into(),
            });
        }

        Ok((api, self.app_token))
    }
}
