//! Recipient-facing query surface: listing, read marking, statistics.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use courier_core::result::AppResult;
use courier_core::types::pagination::{PageRequest, PageResponse};
use courier_entity::notification::model::Notification;
use courier_entity::notification::status::NotificationStatus;
use courier_store::{NotificationQuery, NotificationStats, NotificationStore};

/// Filters accepted by [`QueryService::list_for_recipient`].
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to one kind.
    pub kind: Option<String>,
    /// Restrict to one status.
    pub status: Option<NotificationStatus>,
    /// Restrict to unread records.
    pub unread_only: bool,
}

/// Read-side service over the notification store.
pub struct QueryService {
    store: Arc<dyn NotificationStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// List a recipient's notifications, newest first.
    pub async fn list_for_recipient(
        &self,
        recipient_key: &str,
        filter: ListFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let query = NotificationQuery {
            recipient_key: Some(recipient_key.to_string()),
            kind: filter.kind,
            status: filter.status,
            unread_only: filter.unread_only,
        };

        let total = self.store.count(&query).await?;
        let items = self.store.find_page(&query, page).await?;

        Ok(PageResponse::new(items, page, total))
    }

    /// Mark one notification read. Returns `true` when a record was
    /// actually modified; `false` covers both an unknown id and a
    /// mismatched recipient, indistinguishably.
    pub async fn mark_read(&self, id: Uuid, recipient_key: &str) -> AppResult<bool> {
        let modified = self.store.mark_read(id, recipient_key, Utc::now()).await?;
        debug!(
            notification_id = %id,
            recipient_key = %recipient_key,
            modified,
            "Mark read"
        );
        Ok(modified > 0)
    }

    /// Mark all of a recipient's unread notifications read. Returns the
    /// number of records modified.
    pub async fn mark_all_read(&self, recipient_key: &str) -> AppResult<u64> {
        let modified = self.store.mark_all_read(recipient_key, Utc::now()).await?;
        debug!(recipient_key = %recipient_key, modified, "Mark all read");
        Ok(modified)
    }

    /// Aggregate counts, optionally scoped to one recipient.
    pub async fn statistics(&self, recipient_key: Option<&str>) -> AppResult<NotificationStats> {
        self.store.statistics(recipient_key).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;
    use courier_entity::notification::priority::NotificationPriority;
    use courier_store::MemoryNotificationStore;

    fn sample(recipient: &str, offset_secs: i64, kind: &str) -> Notification {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            recipient_key: recipient.to_string(),
            kind: kind.to_string(),
            title: "Title".to_string(),
            message: String::new(),
            data: json!({}),
            resolved_channels: vec!["realtime".to_string()],
            delivery_outcomes: None,
            status: NotificationStatus::Pending,
            priority: NotificationPriority::Normal,
            attempts: 0,
            max_attempts: 3,
            last_error: None,
            read: false,
            read_at: None,
            metadata: json!({}),
            created_at: now + Duration::seconds(offset_secs),
            updated_at: now,
            scheduled_for: None,
            expires_at: now + Duration::hours(168),
            sent_at: None,
        }
    }

    async fn seeded() -> (QueryService, Arc<MemoryNotificationStore>, Vec<Notification>) {
        let store = Arc::new(MemoryNotificationStore::new());
        let mut inserted = Vec::new();
        for i in 0..5 {
            let n = sample("user-1", i, "generic");
            store.insert(&n).await.unwrap();
            inserted.push(n);
        }
        let other = sample("user-2", 10, "approval_required");
        store.insert(&other).await.unwrap();
        inserted.push(other);

        (QueryService::new(store.clone()), store, inserted)
    }

    #[tokio::test]
    async fn test_list_scopes_to_recipient_newest_first() {
        let (service, _store, inserted) = seeded().await;

        let page = service
            .list_for_recipient("user-1", ListFilter::default(), PageRequest::new(3, 0))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 5);
        assert!(page.has_more);
        // Newest of user-1's five, not user-2's later record.
        assert_eq!(page.items[0].id, inserted[4].id);
    }

    #[tokio::test]
    async fn test_list_offset_window() {
        let (service, _store, _inserted) = seeded().await;

        let page = service
            .list_for_recipient("user-1", ListFilter::default(), PageRequest::new(3, 3))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_mark_read_wrong_recipient_is_noop() {
        let (service, store, inserted) = seeded().await;
        let id = inserted[0].id;

        assert!(!service.mark_read(id, "user-2").await.unwrap());
        assert!(service.mark_read(id, "user-1").await.unwrap());
        assert!(store.get(id).await.unwrap().unwrap().read);
    }

    #[tokio::test]
    async fn test_mark_all_read_returns_count() {
        let (service, _store, _inserted) = seeded().await;

        assert_eq!(service.mark_all_read("user-1").await.unwrap(), 5);
        assert_eq!(service.mark_all_read("user-1").await.unwrap(), 0);

        let stats = service.statistics(Some("user-1")).await.unwrap();
        assert_eq!(stats.unread, 0);
        assert_eq!(stats.total, 5);
    }

    #[tokio::test]
    async fn test_unread_filter() {
        let (service, _store, inserted) = seeded().await;
        service.mark_read(inserted[0].id, "user-1").await.unwrap();

        let filter = ListFilter {
            unread_only: true,
            ..Default::default()
        };
        let page = service
            .list_for_recipient("user-1", filter, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn test_global_statistics() {
        let (service, _store, _inserted) = seeded().await;

        let stats = service.statistics(None).await.unwrap();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 6);
        assert_eq!(stats.sent, 0);
    }
}
