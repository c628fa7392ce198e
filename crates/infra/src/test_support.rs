//! Shared helpers for unit tests that talk to a wiremock device

use routerlink_domain::{ApiVersionDescriptor, Result, RouterLinkError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Descriptor that resolves paths against a plain-HTTP mock server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LocalApi {
    pub base: String,
}

impl LocalApi {
    pub fn new(server: &MockServer) -> Self {
        Self { base: server.uri() }
    }
}

impl ApiVersionDescriptor for LocalApi {
    fn url(&self, relative: &str) -> Result<Url> {
        Url::parse(&format!("{}/api/v8/{}", self.base, relative.trim_start_matches('/')))
            .map_err(|e| RouterLinkError::InvalidApiVersion(e.to_string()))
    }

    fn is_valid(&self) -> bool {
        !self.base.is_empty()
    }

    fn set_query_api_version(&mut self, forced: u32) -> Result<()> {
        if forced > 8 {
            return Err(RouterLinkError::InvalidApiVersion(format!("{forced} > 8")));
        }
        Ok(())
    }
}

/// Mount a device that answers every handshake with `challenge` / `token`
pub(crate) async fn mount_handshake(server: &MockServer, challenge: &str, token: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v8/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "logged_in": false, "challenge": challenge }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v8/login/session/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "session_token": token, "challenge": challenge }
        })))
        .mount(server)
        .await;
}

/// Number of received requests matching `verb` and `target` path
pub(crate) async fn count_requests(server: &MockServer, verb: &str, target: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == target)
        .count()
}
