//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::priority::NotificationPriority;
use super::status::NotificationStatus;

/// A notification record: the central entity of the dispatch subsystem.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier, assigned exactly once at creation.
    pub id: Uuid,
    /// The recipient key: user id, email, or phone, resolved once at
    /// creation and never re-derived.
    pub recipient_key: String,
    /// Event kind that triggered this notification.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Arbitrary structured context payload, opaque to the dispatch core.
    pub data: serde_json::Value,
    /// Channels resolved at creation time. Retries reuse this set; it is
    /// never recomputed.
    pub resolved_channels: Vec<String>,
    /// Per-channel outcomes, written once by the dispatch pass.
    pub delivery_outcomes: Option<serde_json::Value>,
    /// Lifecycle status.
    pub status: NotificationStatus,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Completed processing passes.
    pub attempts: i32,
    /// Maximum delivery attempts.
    pub max_attempts: i32,
    /// Error message from a whole-pass failure, if any.
    pub last_error: Option<String>,
    /// Whether the recipient has read this notification.
    pub read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// Free-form provenance, never interpreted by dispatch logic.
    pub metadata: serde_json::Value,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
    /// Optional future delivery time; absent or past means due now.
    pub scheduled_for: Option<DateTime<Utc>>,
    /// When the notification expires and becomes reclaimable (unless sent).
    pub expires_at: DateTime<Utc>,
    /// When the dispatch pass completed.
    pub sent_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Check if the notification has been read.
    pub fn is_unread(&self) -> bool {
        !self.read
    }

    /// Check if the notification has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check if the notification is due for immediate dispatch as of `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_for.map(|t| t <= now).unwrap_or(true)
    }
}

/// Free-form provenance metadata carried on every notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMetadata {
    /// Originating system.
    pub source: String,
    /// Coarse category for filtering.
    pub category: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Linked entity identifier, if any.
    pub related_entity_id: Option<String>,
    /// Linked entity type, if any.
    pub related_entity_type: Option<String>,
}

impl Default for NotificationMetadata {
    fn default() -> Self {
        Self {
            source: "approval_system".to_string(),
            category: "general".to_string(),
            tags: Vec::new(),
            related_entity_id: None,
            related_entity_type: None,
        }
    }
}
