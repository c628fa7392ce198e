//! Challenge-response session management
//!
//! A [`Session`] turns a long-lived app token into a short-lived session
//! token by answering a device challenge with
//! `hex(HMAC-SHA1(app_token, challenge))`. Readers of the current credential
//! never wait for a handshake in progress: they take a brief read lock on the
//! credential slot, never the refresh lock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hmac::{Hmac, Mac};
use parking_lot::RwLock;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Request;
use routerlink_domain::constants::{LOGIN_PATH, SESSION_HEADER, SESSION_PATH};
use routerlink_domain::{
    ApiVersionDescriptor, AppToken, Challenge, ClientConfig, Result, RouterLinkError,
    SessionCredential,
};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::http::{HttpClient, RequestDecorator};

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Deserialize)]
struct ChallengeResult {
    challenge: Challenge,
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    app_id: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResult {
    session_token: String,
}

#[derive(Default)]
struct CredentialSlots {
    current: Option<Arc<SessionCredential>>,
    previous: Option<Arc<SessionCredential>>,
}

/// Authenticated session bound to one device and one app token
pub struct Session {
    client: HttpClient,
    app_id: String,
    app_token: AppToken,
    challenge_url: Url,
    session_url: Url,
    debounce: Duration,
    clock: Arc<dyn Clock>,
    /// Serializes handshakes; holds the completion time of the last one
    refresh_lock: Mutex<Option<Instant>>,
    slots: RwLock<CredentialSlots>,
}

impl Session {
    /// Open a session, performing the first handshake
    ///
    /// No session is returned unless the handshake succeeds.
    ///
    /// # Errors
    /// Returns `RouterLinkError::InvalidApiVersion` when the login endpoints
    /// cannot be resolved, or whatever error the handshake produced.
    pub async fn establish<V: ApiVersionDescriptor>(
        client: HttpClient,
        api: &V,
        app_token: AppToken,
        config: &ClientConfig,
    ) -> Result<Self> {
        Self::establish_with_clock(client, api, app_token, config, Arc::new(SystemClock)).await
    }

    /// Same as [`Session::establish`] with an explicit time source
    pub async fn establish_with_clock<V: ApiVersionDescriptor>(
        client: HttpClient,
        api: &V,
        app_token: AppToken,
        config: &ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let session = Self {
            client,
            app_id: config.app.app_id.clone(),
            app_token,
            challenge_url: api.url(LOGIN_PATH)?,
            session_url: api.url(SESSION_PATH)?,
            debounce: config.refresh_debounce(),
            clock,
            refresh_lock: Mutex::new(None),
            slots: RwLock::new(CredentialSlots::default()),
        };

        session.refresh().await?;
        Ok(session)
    }

    /// Obtain a fresh session token from the device
    ///
    /// Calls that arrive within the debounce window of the last successful
    /// handshake return immediately, so a burst of auth failures across
    /// concurrent callers costs a single round-trip. A failed handshake leaves
    /// the credential slots untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let mut last_refresh = self.refresh_lock.lock().await;

        if let Some(at) = *last_refresh {
            let since = self.clock.now().saturating_duration_since(at);
            if since < self.debounce {
                debug!(since_ms = since.as_millis() as u64, "Session refreshed recently, skipping");
                return Ok(());
            }
        }

        let credential = Arc::new(self.handshake().await?);
        {
            let mut slots = self.slots.write();
            let old = slots.current.replace(credential);
            slots.previous = old;
        }
        *last_refresh = Some(self.clock.now());

        info!(app_id = %self.app_id, "Session established");
        Ok(())
    }

    async fn handshake(&self) -> Result<SessionCredential> {
        let ChallengeResult { challenge } = self.client.get(self.challenge_url.clone(), &[]).await?;

        let password = compute_password(&self.app_token, &challenge)?;
        let request = SessionRequest { app_id: &self.app_id, password: &password };

        let SessionResult { session_token } =
            self.client.post(self.session_url.clone(), Some(&request), &[]).await?;

        Ok(SessionCredential::new(session_token, challenge))
    }

    /// Whether a session token is held; the device may still reject it
    pub fn is_valid(&self) -> bool {
        self.slots.read().current.is_some()
    }

    /// Snapshot of the current credential
    pub fn current(&self) -> Option<Arc<SessionCredential>> {
        self.slots.read().current.clone()
    }

    /// Credential superseded by the last refresh
    pub fn previous(&self) -> Option<Arc<SessionCredential>> {
        self.slots.read().previous.clone()
    }
}

impl RequestDecorator for Session {
    fn decorate(&self, request: &mut Request) {
        let Some(credential) = self.current() else {
            return;
        };

        if let Ok(value) = HeaderValue::from_str(credential.session_token()) {
            request.headers_mut().insert(HeaderName::from_static(SESSION_HEADER), value);
        }
    }
}

/// Derive the handshake password for `challenge`
///
/// # Errors
/// Returns `RouterLinkError::Config` if the MAC cannot be keyed.
pub fn compute_password(app_token: &AppToken, challenge: &Challenge) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(app_token.expose().as_bytes())
        .map_err(|e| RouterLinkError::Config(format!("cannot key HMAC: {e}")))?;
    mac.update(challenge.as_str().as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
