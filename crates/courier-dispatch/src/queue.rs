//! In-memory FIFO dispatch queue.

use std::collections::VecDeque;

use tokio::sync::Mutex;
use tracing::debug;

use courier_entity::notification::model::Notification;

/// FIFO queue of notifications awaiting a processing pass.
///
/// Purely in memory: queue contents do not survive a restart, but every
/// queued notification is already persisted, so nothing is lost with them.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    items: Mutex<VecDeque<Notification>>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification to the back of the queue.
    pub async fn enqueue(&self, notification: Notification) {
        let mut items = self.items.lock().await;
        items.push_back(notification);
        debug!(depth = items.len(), "Notification enqueued");
    }

    /// Take the notification at the front of the queue, if any.
    pub async fn pop(&self) -> Option<Notification> {
        self.items.lock().await.pop_front()
    }

    /// Current queue depth.
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use courier_entity::notification::priority::NotificationPriority;
    use courier_entity::notification::status::NotificationStatus;

    fn sample(title: &str) -> Notification {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            recipient_key: "user-1".to_string(),
            kind: "generic".to_string(),
            title: title.to_string(),
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
            created_at: now,
            updated_at: now,
            scheduled_for: None,
            expires_at: now + Duration::hours(168),
            sent_at: None,
        }
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = DispatchQueue::new();
        queue.enqueue(sample("first")).await;
        queue.enqueue(sample("second")).await;
        queue.enqueue(sample("third")).await;

        assert_eq!(queue.len().await, 3);
        assert_eq!(queue.pop().await.map(|n| n.title).as_deref(), Some("first"));
        assert_eq!(queue.pop().await.map(|n| n.title).as_deref(), Some("second"));
        assert_eq!(queue.pop().await.map(|n| n.title).as_deref(), Some("third"));
        assert!(queue.pop().await.is_none());
        assert!(queue.is_empty().await);
    }
}
