//! Credential types
//!
//! `Debug` output of every secret-bearing type is redacted so that a stray
//! `?value` in a tracing event never leaks a token.

use std::fmt;

use serde::{Deserialize, Serialize};

const REDACTED: &str = "<redacted>";

/// Long-lived application token issued by the authorization grant
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppToken(String);

impl AppToken {
    /// Wrap a token issued by the device
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw secret. Only the password derivation and persistence need it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is blank, i.e. no grant has completed
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AppToken").field(&REDACTED).finish()
    }
}

/// Single-use random value issued by the device for one handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Challenge(String);

impl Challenge {
    /// Wrap a challenge returned by the device
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The challenge text, used as the HMAC message
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short-lived credential derived from an app token and a challenge
///
/// Instances are immutable; a refresh installs a new one rather than
/// mutating the current one, so a reader always sees a token together with
/// the challenge it was derived from.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    session_token: String,
    challenge: Challenge,
}

impl SessionCredential {
    /// Pair a session token with the challenge it answered
    pub fn new(session_token: impl Into<String>, challenge: Challenge) -> Self {
        Self { session_token: session_token.into(), challenge }
    }

    /// Value sent in the session header
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Challenge this credential was derived from
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("session_token", &REDACTED)
            .field("challenge", &self.challenge)
            .finish()
    }
}
