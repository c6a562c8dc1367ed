//! Submission request: the caller-supplied attributes of a notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::priority::NotificationPriority;

/// Attributes supplied by a caller when submitting a notification.
///
/// Everything except `kind` is optional; defaults are derived during
/// ingestion (title from kind, expiry from priority, and so on).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Event kind (e.g. `"approval_required"`).
    pub kind: String,
    /// Explicit title; defaulted from `kind` when absent.
    #[serde(default)]
    pub title: Option<String>,
    /// Explicit body text.
    #[serde(default)]
    pub message: Option<String>,
    /// Structured context payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Priority; defaults to `normal`.
    #[serde(default)]
    pub priority: Option<NotificationPriority>,
    /// Optional future delivery time.
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Explicit expiry; defaulted from priority when absent.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum delivery attempts; defaults from configuration.
    #[serde(default)]
    pub max_attempts: Option<i32>,
    /// Originating system for provenance metadata.
    #[serde(default)]
    pub source: Option<String>,
    /// Category for provenance metadata.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form tags for provenance metadata.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Linked entity identifier.
    #[serde(default)]
    pub related_entity_id: Option<String>,
    /// Linked entity type.
    #[serde(default)]
    pub related_entity_type: Option<String>,
}

impl NotificationRequest {
    /// Create a request with just a kind; everything else defaulted.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the structured payload.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
