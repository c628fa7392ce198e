//! Authorization grant status reported by `login/authorize/{track_id}`

use serde::{Deserialize, Serialize};

use crate::impl_wire_status_conversions;

/// State of an out-of-band authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    /// The device has not recorded a decision
    Unknown,
    /// Waiting for a human to accept on the device
    Pending,
    /// The user did not answer in time
    Timeout,
    Granted,
    Denied,
}

impl_wire_status_conversions!(GrantStatus {
    Unknown => "unknown",
    Pending => "pending",
    Timeout => "timeout",
    Granted => "granted",
    Denied => "denied",
});
