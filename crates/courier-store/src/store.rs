//! The notification store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use courier_core::result::AppResult;
use courier_core::types::pagination::PageRequest;
use courier_entity::notification::model::Notification;
use courier_entity::notification::status::NotificationStatus;

/// Filter for store lookups. Absent fields match everything; ordering is
/// always `created_at` descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationQuery {
    /// Restrict to one recipient.
    pub recipient_key: Option<String>,
    /// Restrict to one kind.
    pub kind: Option<String>,
    /// Restrict to one status.
    pub status: Option<NotificationStatus>,
    /// Restrict to unread records.
    pub unread_only: bool,
}

impl NotificationQuery {
    /// Query scoped to a single recipient.
    pub fn for_recipient(recipient_key: impl Into<String>) -> Self {
        Self {
            recipient_key: Some(recipient_key.into()),
            ..Default::default()
        }
    }
}

/// Partial lifecycle update applied by the dispatch pass.
///
/// Only the populated fields are written; `updated_at` is always touched.
#[derive(Debug, Clone, Default)]
pub struct NotificationUpdate {
    /// New lifecycle status.
    pub status: Option<NotificationStatus>,
    /// Serialized per-channel outcome list.
    pub delivery_outcomes: Option<serde_json::Value>,
    /// Dispatch pass completion time.
    pub sent_at: Option<DateTime<Utc>>,
    /// New attempt count.
    pub attempts: Option<i32>,
    /// Whole-pass error message.
    pub last_error: Option<String>,
}

/// Aggregate notification counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationStats {
    /// All notifications in scope.
    pub total: i64,
    /// Notifications with status `sent`.
    pub sent: i64,
    /// Notifications with status `failed`.
    pub failed: i64,
    /// Notifications with status `pending`.
    pub pending: i64,
    /// Unread notifications.
    pub unread: i64,
}

/// Durable notification record storage.
///
/// Implementations must support efficient recipient+time listing and
/// `expires_at < now` scans (the reclamation path).
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new record. Failure here means the notification must not
    /// be enqueued.
    async fn insert(&self, notification: &Notification) -> AppResult<()>;

    /// Fetch one record by id.
    async fn get(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Apply a partial lifecycle update to one record.
    async fn apply(&self, id: Uuid, update: NotificationUpdate) -> AppResult<()>;

    /// Mark one record read for a recipient. Returns the number of rows
    /// modified (0 when the id/recipient pair does not match).
    async fn mark_read(
        &self,
        id: Uuid,
        recipient_key: &str,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Mark every unread record for a recipient read. Returns the number
    /// of rows modified.
    async fn mark_all_read(&self, recipient_key: &str, at: DateTime<Utc>) -> AppResult<u64>;

    /// Delete every record with `expires_at < now` and status other than
    /// `sent`. Returns the number of rows deleted.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Fetch a window of records matching the query, newest first.
    async fn find_page(
        &self,
        query: &NotificationQuery,
        page: PageRequest,
    ) -> AppResult<Vec<Notification>>;

    /// Count records matching the query.
    async fn count(&self, query: &NotificationQuery) -> AppResult<u64>;

    /// Aggregate counts, optionally scoped to one recipient.
    async fn statistics(&self, recipient_key: Option<&str>) -> AppResult<NotificationStats>;
}
