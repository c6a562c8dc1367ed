//! Per-channel delivery outcome recorded after a dispatch attempt.

use serde::{Deserialize, Serialize};

/// Result of one channel's delivery attempt for one notification.
///
/// Exactly one of `result` / `error` is populated, matching `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Channel name ("email", "sms", "realtime", "push").
    pub channel: String,
    /// Whether the adapter reported success.
    pub success: bool,
    /// Provider-specific result payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    /// Record a successful delivery attempt.
    pub fn succeeded(channel: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            channel: channel.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    /// Record a failed delivery attempt.
    pub fn failed(channel: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}
