//! Out-of-band authorization grant
//!
//! A new application asks the device for an app token, then polls the grant
//! until someone approves (or rejects) it on the device front panel.

use routerlink_domain::constants::AUTHORIZE_PATH;
use routerlink_domain::{
    ApiVersionDescriptor, AppToken, ClientConfig, GrantStatus, Result, RouterLinkError,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::http::HttpClient;

#[derive(Deserialize)]
struct AuthorizeResult {
    app_token: AppToken,
    track_id: i64,
}

#[derive(Debug, Deserialize)]
struct TrackResult {
    status: String,
}

/// Request an app token for `config.app` and wait for the grant
///
/// Polls every `grant_poll_interval` while the grant is pending, for at most
/// `grant_max_attempts` polls.
///
/// # Errors
/// - `RouterLinkError::GrantDenied` when the device reports any status other
///   than pending or granted
/// - `RouterLinkError::GrantTimeout` when the grant is still pending after the
///   last poll
/// - transport and envelope errors from either endpoint
#[instrument(skip_all, fields(app_id = %config.app.app_id))]
pub async fn request_app_token<V: ApiVersionDescriptor>(
    client: &HttpClient,
    api: &V,
    config: &ClientConfig,
) -> Result<AppToken> {
    let AuthorizeResult { app_token, track_id } =
        client.post(api.url(AUTHORIZE_PATH)?, Some(&config.app), &[]).await?;
    debug!(track_id, "Authorization requested");

    let track_url = api.url(&format!("{AUTHORIZE_PATH}{track_id}"))?;
    let attempts = config.grant_max_attempts;

    for attempt in 1..=attempts {
        let TrackResult { status } = client.get(track_url.clone(), &[]).await?;

        match status.parse::<GrantStatus>() {
            Ok(GrantStatus::Granted) => {
                info!(track_id, "Authorization granted");
                return Ok(app_token);
            }
            Ok(GrantStatus::Pending) => {
                info!(attempt, attempts, "Please accept the application on the device");
                if attempt < attempts {
                    tokio::time::sleep(config.grant_poll_interval()).await;
                }
            }
            _ => return Err(RouterLinkError::GrantDenied { status }),
        }
    }

    Err(RouterLinkError::GrantTimeout { attempts })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::{count_requests, LocalApi};

    fn config(max_attempts: u32) -> ClientConfig {
        ClientConfig {
            grant_poll_interval_millis: 1,
            grant_max_attempts: max_attempts,
            ..Default::default()
        }
    }

    async fn mount_authorize(server: &MockServer) {
        let app = ClientConfig::default().app;
        Mock::given(method("POST"))
            .and(path("/api/v8/login/authorize/"))
            .and(body_json(json!({
                "app_id": app.app_id,
                "app_name": app.app_name,
                "app_version": app.app_version,
                "device_name": app.device_name,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": { "app_token": "granted-token", "track_id": 42 }
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    fn track(status: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": { "status": status, "challenge": "c" }
        }))
    }

    #[tokio::test]
    async fn pending_then_granted_returns_token() {
        let server = MockServer::start().await;
        mount_authorize(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v8/login/authorize/42"))
            .respond_with(track("pending"))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v8/login/authorize/42"))
            .respond_with(track("granted"))
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().unwrap();
        let token =
            request_app_token(&client, &LocalApi::new(&server), &config(5)).await.unwrap();

        assert_eq!(token.expose(), "granted-token");
        assert_eq!(count_requests(&server, "GET", "/api/v8/login/authorize/42").await, 3);
    }

    #[tokio::test]
    async fn denied_grant_is_reported() {
        let server = MockServer::start().await;
        mount_authorize(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v8/login/authorize/42"))
            .respond_with(track("denied"))
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().unwrap();
        let err = request_app_token(&client, &LocalApi::new(&server), &config(5)).await.unwrap_err();

        match err {
            RouterLinkError::GrantDenied { status } => assert_eq!(status, "denied"),
            other => panic!("expected grant denial, got {:?}", other),
        }
        assert_eq!(count_requests(&server, "GET", "/api/v8/login/authorize/42").await, 1);
    }

    #[tokio::test]
    async fn unknown_statuses_are_denials() {
        let server = MockServer::start().await;
        mount_authorize(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v8/login/authorize/42"))
            .respond_with(track("exploded"))
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().unwrap();
        let err = request_app_token(&client, &LocalApi::new(&server), &config(5)).await.unwrap_err();
        assert!(err.to_string().contains("access is exploded"));
    }

    #[tokio::test]
    async fn pending_forever_times_out() {
        let server = MockServer::start().await;
        mount_authorize(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v8/login/authorize/42"))
            .respond_with(track("pending"))
            .mount(&server)
            .await;

        let client = HttpClient::builder().timeout(Duration::from_secs(2)).build().unwrap();
        let err = request_app_token(&client, &LocalApi::new(&server), &config(3)).await.unwrap_err();

        assert!(matches!(err, RouterLinkError::GrantTimeout { attempts: 3 }));
        assert_eq!(count_requests(&server, "GET", "/api/v8/login/authorize/42").await, 3);
    }
}
