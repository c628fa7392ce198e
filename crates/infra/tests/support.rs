#![allow(dead_code)]

use routerlink_domain::{ApiVersionDescriptor, ClientConfig, Result, RouterLinkError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_TOKEN: &str = "app-token-0123";

/// Descriptor pointing at a plain-HTTP mock device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockApiVersion {
    pub base: String,
    pub max_version: u32,
    #[serde(skip)]
    pub query_version: u32,
}

impl MockApiVersion {
    pub fn new(server: &MockServer) -> Self {
        Self { base: server.uri(), max_version: 8, query_version: 0 }
    }
}

impl ApiVersionDescriptor for MockApiVersion {
    fn url(&self, relative: &str) -> Result<Url> {
        let version = if self.query_version == 0 { self.max_version } else { self.query_version };
        Url::parse(&format!("{}/api/v{}/{}", self.base, version, relative))
            .map_err(|e| RouterLinkError::InvalidApiVersion(e.to_string()))
    }

    fn is_valid(&self) -> bool {
        !self.base.is_empty() && self.max_version > 0
    }

    fn set_query_api_version(&mut self, forced: u32) -> Result<()> {
        if forced > self.max_version {
            return Err(RouterLinkError::InvalidApiVersion(format!(
                "forced API version {forced} is above the device maximum {}",
                self.max_version
            )));
        }
        self.query_version = if forced == 0 { self.max_version } else { forced };
        Ok(())
    }
}

/// Settings without refresh debounce so every auth failure hits the device.
pub fn test_config() -> ClientConfig {
    ClientConfig {
        request_timeout_seconds: 2,
        refresh_debounce_millis: 0,
        grant_poll_interval_millis: 5,
        grant_max_attempts: 3,
        ..Default::default()
    }
}

/// Persisted document for `server` carrying `app_token`.
pub fn persisted_document(server: &MockServer, app_token: &str) -> String {
    json!({ "api": MockApiVersion::new(server), "app_token": app_token }).to_string()
}

/// Mount a device that answers every handshake with `session_token`.
pub async fn mount_handshake(server: &MockServer, session_token: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v8/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "logged_in": false, "challenge": "challenge-xyz" }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v8/login/session/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "session_token": session_token }
        })))
        .mount(server)
        .await;
}

pub fn auth_failure(code: &str) -> ResponseTemplate {
    ResponseTemplate::new(403).set_body_json(json!({
        "success": false,
        "msg": "Vous devez vous connecter pour accéder à cette fonction",
        "error_code": code
    }))
}

pub async fn count_requests(server: &MockServer, verb: &str, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == target)
        .count()
}
