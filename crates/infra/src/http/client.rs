use std::time::Duration;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Request};
use routerlink_domain::constants::{ERROR_AUTH_REQUIRED, ERROR_INVALID_TOKEN};
use routerlink_domain::{ClientConfig, Result, RouterLinkError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::redact::redact_body;

/// Hook applied to every outgoing request before it is sent.
///
/// Decorators run in order and may add or override headers. They must not
/// block or fail.
pub trait RequestDecorator: Send + Sync {
    /// Adjust `request` in place, typically by inserting headers.
    fn decorate(&self, request: &mut Request);
}

impl<D: RequestDecorator + ?Sized> RequestDecorator for &D {
    fn decorate(&self, request: &mut Request) {
        (**self).decorate(request);
    }
}

/// An absent decorator leaves the request untouched.
impl<D: RequestDecorator> RequestDecorator for Option<D> {
    fn decorate(&self, request: &mut Request) {
        if let Some(decorator) = self {
            decorator.decorate(request);
        }
    }
}

/// Uniform response wrapper returned by every device endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    error_code: String,
    #[serde(default)]
    result: serde_json::Value,
}

/// JSON-over-HTTPS transport for the device API.
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Build a client from the transport settings of `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .timeout(config.request_timeout())
            .pool_idle_timeout(config.pool_idle_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }

    /// GET `url` and decode the envelope `result` into `T`.
    ///
    /// Use `serde::de::IgnoredAny` as `T` to discard the payload.
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        decorators: &[&dyn RequestDecorator],
    ) -> Result<T> {
        let request = self.build(Method::GET, url, None)?;
        self.execute(request, decorators).await
    }

    /// POST `body` as JSON to `url` and decode the envelope `result` into `T`.
    ///
    /// A `None` body sends an empty request without a content type.
    pub async fn post<B, T>(
        &self,
        url: Url,
        body: Option<&B>,
        decorators: &[&dyn RequestDecorator],
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = body
            .map(|b| {
                serde_json::to_vec(b).map_err(|e| {
                    RouterLinkError::Serialization(format!("cannot encode request body: {e}"))
                })
            })
            .transpose()?;

        let request = self.build(Method::POST, url, payload)?;
        self.execute(request, decorators).await
    }

    fn build(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<Request> {
        let mut builder = self.client.request(method.clone(), url.clone());
        if let Some(bytes) = body {
            builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            builder = builder.body(bytes);
        }
        builder.build().map_err(|e| transport_error(&method, &url, &e))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: Request,
        decorators: &[&dyn RequestDecorator],
    ) -> Result<T> {
        for decorator in decorators {
            decorator.decorate(&mut request);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, path = url.path(), "HTTP request");

        let response =
            self.client.execute(request).await.map_err(|e| transport_error(&method, &url, &e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&method, &url, &e))?;

        debug!(%method, path = url.path(), %status, body = %redact_body(&body), "HTTP response");

        decode_envelope(&method, &url, &body)
    }
}

/// Unwrap the device envelope, classifying failures.
///
/// The HTTP status is ignored. The device answers auth failures with a 403
/// carrying a regular envelope.
fn decode_envelope<T: DeserializeOwned>(method: &Method, url: &Url, body: &[u8]) -> Result<T> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| RouterLinkError::EnvelopeParse {
            method: method.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if !envelope.success {
        let method = method.to_string();
        let url = url.to_string();
        return Err(match envelope.error_code.as_str() {
            ERROR_AUTH_REQUIRED => RouterLinkError::AuthRequired { method, url },
            ERROR_INVALID_TOKEN => RouterLinkError::InvalidToken { method, url },
            _ => RouterLinkError::Api {
                method,
                url,
                code: envelope.error_code,
                message: envelope.msg,
            },
        });
    }

    serde_json::from_value(envelope.result).map_err(|e| RouterLinkError::Decode {
        method: method.to_string(),
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn transport_error(method: &Method, url: &Url, err: &reqwest::Error) -> RouterLinkError {
    let message = if err.is_timeout() { format!("timed out: {err}") } else { err.to_string() };
    RouterLinkError::Transport { method: method.to_string(), url: url.to_string(), message }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    pool_idle_timeout: Duration,
    pool_max_idle_per_host: usize,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        let defaults = ClientConfig::default();
        Self {
            timeout: defaults.request_timeout(),
            pool_idle_timeout: defaults.pool_idle_timeout(),
            pool_max_idle_per_host: defaults.pool_max_idle_per_host,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Overall deadline for one exchange, response body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How long an idle pooled connection is kept before closing.
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Maximum number of idle connections kept per host.
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Replace the default `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Returns `RouterLinkError::Config` if the TLS backend cannot be
    /// initialized.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|e| RouterLinkError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(HttpClient { client })
    }
}
