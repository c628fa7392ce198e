//! Authenticated connection to the device API
//!
//! [`Connection`] resolves API paths, decorates requests with the session
//! token and transparently recovers from an expired session: an auth-class
//! failure triggers one refresh and exactly one retry.

use std::io::{Read, Write};

use reqwest::Method;
use routerlink_domain::constants::LOGOUT_PATH;
use routerlink_domain::{
    ApiVersion, ApiVersionDescriptor, AppToken, ClientConfig, PersistedConfig, Result,
    RouterLinkError,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use super::authorize::request_app_token;
use super::session::Session;
use crate::http::{HttpClient, RequestDecorator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retried,
}

/// Device API connection backed by an authenticated [`Session`]
///
/// All methods take `&self` and may be called concurrently.
pub struct Connection<V: ApiVersionDescriptor = ApiVersion> {
    client: HttpClient,
    session: Session,
    api: V,
    app_token: AppToken,
}

impl<V: ApiVersionDescriptor> Connection<V> {
    /// Connect to a freshly discovered device, requesting a new app token
    ///
    /// Blocks until the authorization is accepted on the device, denied, or
    /// the configured number of polls is exhausted.
    ///
    /// # Errors
    /// Fails without returning a partial connection if the settings or the
    /// descriptor are invalid, the grant is not obtained, or the first
    /// session handshake fails.
    #[instrument(skip_all, fields(forced_api_version = forced_api_version))]
    pub async fn connect(
        mut discovered: V,
        forced_api_version: u32,
        config: &ClientConfig,
    ) -> Result<Self> {
        config.validate()?;
        discovered.set_query_api_version(forced_api_version)?;
        if !discovered.is_valid() {
            return Err(RouterLinkError::InvalidApiVersion(format!(
                "incomplete descriptor {discovered:?}"
            )));
        }

        let client = HttpClient::from_config(config)?;
        let app_token = request_app_token(&client, &discovered, config).await?;

        Self::open(client, discovered, app_token, config).await
    }

    /// Reconnect using a document previously produced by
    /// [`Connection::write_config`]
    ///
    /// The document is validated before any network traffic.
    ///
    /// # Errors
    /// - `RouterLinkError::Serialization` if the stream is not a document
    /// - `RouterLinkError::ConfigValidation` naming `api` or `app_token`
    /// - any session handshake error
    #[instrument(skip_all, fields(forced_api_version = forced_api_version))]
    pub async fn from_persisted<R: Read>(
        reader: R,
        forced_api_version: u32,
        config: &ClientConfig,
    ) -> Result<Self> {
        config.validate()?;
        let (api, app_token) =
            PersistedConfig::<V>::read_from(reader)?.validate(forced_api_version)?;

        let client = HttpClient::from_config(config)?;
        Self::open(client, api, app_token, config).await
    }

    async fn open(
        client: HttpClient,
        api: V,
        app_token: AppToken,
        config: &ClientConfig,
    ) -> Result<Self> {
        let session = Session::establish(client.clone(), &api, app_token.clone(), config).await?;
        info!("Connection established");

        Ok(Self { client, session, api, app_token })
    }

    /// GET `path` and decode the envelope result into `T`
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await
    }

    /// POST `body` to `path` and decode the envelope result into `T`
    #[instrument(skip(self, body))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(|e| {
            RouterLinkError::Serialization(format!("cannot encode request body: {e}"))
        })?;
        self.request(Method::POST, path, Some(&body)).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.api.url(path)?;
        let mut attempt = Attempt::First;

        loop {
            match self.send(&method, url.clone(), body).await {
                Err(e) if e.is_auth() && attempt == Attempt::First => {
                    warn!(error = %e, "Session rejected, refreshing");
                    self.session.refresh().await?;
                    attempt = Attempt::Retried;
                }
                outcome => return outcome,
            }
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<T> {
        let decorators: [&dyn RequestDecorator; 1] = [&self.session];
        if *method == Method::POST {
            self.client.post(url, body, &decorators).await
        } else {
            self.client.get(url, &decorators).await
        }
    }

    /// Persist the API descriptor and app token
    ///
    /// Session credentials are never written.
    pub fn write_config<W: Write>(&self, writer: W) -> Result<()> {
        PersistedConfig::new(self.api.clone(), self.app_token.clone()).write_to(writer)
    }

    /// Log out from the device
    ///
    /// The body is a JSON `null`, as the device expects a JSON payload on
    /// every POST. Failure is logged and returned; the connection stays usable.
    #[instrument(skip(self))]
    pub async fn close(&self) -> Result<()> {
        let url = self.api.url(LOGOUT_PATH)?;
        let decorators: [&dyn RequestDecorator; 1] = [&self.session];

        let body = Some(&Value::Null);
        match self.client.post::<Value, IgnoredAny>(url, body, &decorators).await {
            Ok(_) => {
                info!("Connection closed");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Logout failed");
                Err(e)
            }
        }
    }

    /// Session whose credential decorates every request
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Versioned API descriptor requests are resolved against
    pub fn api(&self) -> &V {
        &self.api
    }

    /// App token the session is derived from
    pub fn app_token(&self) -> &AppToken {
        &self.app_token
    }
}
