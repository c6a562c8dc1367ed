//! In-memory notification store.
//!
//! Backs local development and tests; semantics mirror the PostgreSQL
//! implementation, including `created_at` descending ordering.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use courier_core::result::AppResult;
use courier_core::types::pagination::PageRequest;
use courier_entity::notification::model::Notification;
use courier_entity::notification::status::NotificationStatus;

use crate::store::{NotificationQuery, NotificationStats, NotificationStore, NotificationUpdate};

/// Notification store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    records: RwLock<Vec<Notification>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(n: &Notification, query: &NotificationQuery) -> bool {
        if let Some(recipient) = &query.recipient_key {
            if &n.recipient_key != recipient {
                return false;
            }
        }
        if let Some(kind) = &query.kind {
            if &n.kind != kind {
                return false;
            }
        }
        if let Some(status) = query.status {
            if n.status != status {
                return false;
            }
        }
        if query.unread_only && !n.is_unread() {
            return false;
        }
        true
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.push(notification.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Notification>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|n| n.id == id).cloned())
    }

    async fn apply(&self, id: Uuid, update: NotificationUpdate) -> AppResult<()> {
        let mut records = self.records.write().await;
        if let Some(n) = records.iter_mut().find(|n| n.id == id) {
            if let Some(status) = update.status {
                n.status = status;
            }
            if let Some(outcomes) = update.delivery_outcomes {
                n.delivery_outcomes = Some(outcomes);
            }
            if let Some(sent_at) = update.sent_at {
                n.sent_at = Some(sent_at);
            }
            if let Some(attempts) = update.attempts {
                n.attempts = attempts;
            }
            if let Some(last_error) = update.last_error {
                n.last_error = Some(last_error);
            }
            n.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient_key: &str,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut modified = 0;
        if let Some(n) = records
            .iter_mut()
            .find(|n| n.id == id && n.recipient_key == recipient_key && !n.read)
        {
            n.read = true;
            n.read_at = Some(at);
            n.updated_at = Utc::now();
            modified = 1;
        }
        Ok(modified)
    }

    async fn mark_all_read(&self, recipient_key: &str, at: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut modified = 0;
        for n in records
            .iter_mut()
            .filter(|n| n.recipient_key == recipient_key && !n.read)
        {
            n.read = true;
            n.read_at = Some(at);
            n.updated_at = Utc::now();
            modified += 1;
        }
        Ok(modified)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|n| !(n.expires_at < now && n.status != NotificationStatus::Sent));
        Ok((before - records.len()) as u64)
    }

    async fn find_page(
        &self,
        query: &NotificationQuery,
        page: PageRequest,
    ) -> AppResult<Vec<Notification>> {
        let records = self.records.read().await;
        let mut matched: Vec<Notification> = records
            .iter()
            .filter(|n| Self::matches(n, query))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, query: &NotificationQuery) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|n| Self::matches(n, query)).count() as u64)
    }

    async fn statistics(&self, recipient_key: Option<&str>) -> AppResult<NotificationStats> {
        let records = self.records.read().await;
        let mut stats = NotificationStats::default();
        for n in records
            .iter()
            .filter(|n| recipient_key.is_none_or(|key| n.recipient_key == key))
        {
            stats.total += 1;
            match n.status {
                NotificationStatus::Sent => stats.sent += 1,
                NotificationStatus::Failed => stats.failed += 1,
                NotificationStatus::Pending => stats.pending += 1,
            }
            if !n.read {
                stats.unread += 1;
            }
        }
        Ok(stats)
    }
}
