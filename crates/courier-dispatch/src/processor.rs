//! The processing pass: drains the queue and fans notifications out to
//! their resolved channels.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, warn};

use courier_channels::adapter::ChannelSet;
use courier_entity::notification::model::Notification;
use courier_entity::notification::outcome::DeliveryOutcome;

use crate::lifecycle::LifecycleTracker;
use crate::queue::DispatchQueue;

/// Drains the dispatch queue and delivers notifications.
///
/// At most one drain runs at a time: a tick that fires while a previous
/// drain is still working returns immediately. One notification never has
/// two concurrent processing passes.
pub struct Dispatcher {
    queue: Arc<DispatchQueue>,
    channels: ChannelSet,
    lifecycle: LifecycleTracker,
    draining: AtomicBool,
    drains_started: AtomicU64,
}

impl Dispatcher {
    pub fn new(queue: Arc<DispatchQueue>, channels: ChannelSet, lifecycle: LifecycleTracker) -> Self {
        Self {
            queue,
            channels,
            lifecycle,
            draining: AtomicBool::new(false),
            drains_started: AtomicU64::new(0),
        }
    }

    /// Drain the queue to empty, processing notifications in FIFO order.
    ///
    /// Returns the number of notifications processed; zero when the queue
    /// was empty or another drain was already in progress.
    pub async fn drain(&self) -> usize {
        if self
            .draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Drain already in progress, skipping tick");
            return 0;
        }
        self.drains_started.fetch_add(1, Ordering::SeqCst);

        let mut processed = 0;
        while let Some(notification) = self.queue.pop().await {
            self.process(notification).await;
            processed += 1;
        }

        self.draining.store(false, Ordering::SeqCst);
        processed
    }

    /// Number of drains that actually started (acquired the guard).
    pub fn drains_started(&self) -> u64 {
        self.drains_started.load(Ordering::SeqCst)
    }

    /// Run one notification through every resolved channel sequentially.
    ///
    /// A channel failure is recorded in that channel's outcome and the pass
    /// moves on. An unknown channel name is logged and skipped without an
    /// outcome entry.
    async fn process(&self, notification: Notification) {
        if notification.resolved_channels.is_empty() {
            self.lifecycle
                .record_pass_failure(
                    notification.id,
                    "no deliverable channels",
                    notification.attempts + 1,
                )
                .await;
            return;
        }

        let mut outcomes = Vec::with_capacity(notification.resolved_channels.len());

        for channel in &notification.resolved_channels {
            let Some(adapter) = self.channels.get(channel) else {
                warn!(
                    notification_id = %notification.id,
                    channel = %channel,
                    "Unknown notification channel, skipping"
                );
                continue;
            };

            match adapter.deliver(&notification).await {
                Ok(result) => {
                    outcomes.push(DeliveryOutcome::succeeded(channel.clone(), result));
                }
                Err(e) => {
                    error!(
                        notification_id = %notification.id,
                        channel = %channel,
                        error = %e,
                        "Channel delivery failed"
                    );
                    outcomes.push(DeliveryOutcome::failed(channel.clone(), e.to_string()));
                }
            }
        }

        self.lifecycle
            .record_outcomes(notification.id, &outcomes, notification.attempts + 1)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use courier_channels::adapter::{ChannelAdapter, ChannelError};
    use courier_entity::notification::priority::NotificationPriority;
    use courier_entity::notification::status::NotificationStatus;
    use courier_store::{MemoryNotificationStore, NotificationStore};

    struct Succeeding(&'static str);

    #[async_trait]
    impl ChannelAdapter for Succeeding {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn deliver(
            &self,
            _notification: &Notification,
        ) -> Result<serde_json::Value, ChannelError> {
            tokio::task::yield_now().await;
            Ok(json!({"delivered": true}))
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl ChannelAdapter for Failing {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn deliver(
            &self,
            _notification: &Notification,
        ) -> Result<serde_json::Value, ChannelError> {
            Err(ChannelError::Provider("boom".to_string()))
        }
    }

    fn sample(channels: &[&str]) -> Notification {
        let now = Utc::now();
        Notification {
            id: Uuid::new_v4(),
            recipient_key: "user-1".to_string(),
            kind: "generic".to_string(),
            title: "Title".to_string(),
            message: String::new(),
            data: json!({}),
            resolved_channels: channels.iter().map(|c| c.to_string()).collect(),
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

    fn dispatcher(
        store: Arc<MemoryNotificationStore>,
        channels: ChannelSet,
    ) -> (Arc<Dispatcher>, Arc<DispatchQueue>) {
        let queue = Arc::new(DispatchQueue::new());
        let dispatcher = Arc::new(Dispatcher::new(
            queue.clone(),
            channels,
            LifecycleTracker::new(store),
        ));
        (dispatcher, queue)
    }

    #[tokio::test]
    async fn test_partial_channel_failure_still_sends() {
        let store = Arc::new(MemoryNotificationStore::new());
        let channels = ChannelSet::new()
            .with(Arc::new(Failing("email")))
            .with(Arc::new(Succeeding("realtime")));
        let (dispatcher, queue) = dispatcher(store.clone(), channels);

        let n = sample(&["email", "realtime"]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n.clone()).await;

        assert_eq!(dispatcher.drain().await, 1);

        let fetched = store.get(n.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, NotificationStatus::Sent);
        assert_eq!(fetched.attempts, 1);

        let outcomes: Vec<DeliveryOutcome> =
            serde_json::from_value(fetched.delivery_outcomes.unwrap()).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].success);
        assert!(outcomes[1].success);
    }

    #[tokio::test]
    async fn test_all_channels_failing_marks_failed() {
        let store = Arc::new(MemoryNotificationStore::new());
        let channels = ChannelSet::new().with(Arc::new(Failing("email")));
        let (dispatcher, queue) = dispatcher(store.clone(), channels);

        let n = sample(&["email"]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n.clone()).await;
        dispatcher.drain().await;

        let fetched = store.get(n.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, NotificationStatus::Failed);
    }

    #[tokio::test]
    async fn test_unknown_channel_skipped_without_outcome() {
        let store = Arc::new(MemoryNotificationStore::new());
        let channels = ChannelSet::new().with(Arc::new(Succeeding("realtime")));
        let (dispatcher, queue) = dispatcher(store.clone(), channels);

        let n = sample(&["carrier_pigeon", "realtime"]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n.clone()).await;
        dispatcher.drain().await;

        let fetched = store.get(n.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, NotificationStatus::Sent);

        let outcomes: Vec<DeliveryOutcome> =
            serde_json::from_value(fetched.delivery_outcomes.unwrap()).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].channel, "realtime");
    }

    #[tokio::test]
    async fn test_no_channels_records_pass_failure() {
        let store = Arc::new(MemoryNotificationStore::new());
        let (dispatcher, queue) = dispatcher(store.clone(), ChannelSet::new());

        let n = sample(&[]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n.clone()).await;
        dispatcher.drain().await;

        let fetched = store.get(n.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, NotificationStatus::Failed);
        assert_eq!(fetched.last_error.as_deref(), Some("no deliverable channels"));
        assert_eq!(fetched.attempts, 1);
    }

    #[tokio::test]
    async fn test_concurrent_drains_do_not_overlap() {
        let store = Arc::new(MemoryNotificationStore::new());
        let channels = ChannelSet::new().with(Arc::new(Succeeding("realtime")));
        let (dispatcher, queue) = dispatcher(store.clone(), channels);

        for _ in 0..20 {
            let n = sample(&["realtime"]);
            store.insert(&n).await.unwrap();
            queue.enqueue(n).await;
        }

        let a = tokio::spawn({
            let d = dispatcher.clone();
            async move { d.drain().await }
        });
        let b = tokio::spawn({
            let d = dispatcher.clone();
            async move { d.drain().await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        // Every item processed exactly once, by at most two drains that
        // never ran concurrently.
        assert_eq!(a + b, 20);
        assert!(dispatcher.drains_started() <= 2);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn test_drain_after_drain_is_allowed() {
        let store = Arc::new(MemoryNotificationStore::new());
        let channels = ChannelSet::new().with(Arc::new(Succeeding("realtime")));
        let (dispatcher, queue) = dispatcher(store.clone(), channels);

        let n = sample(&["realtime"]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n).await;
        assert_eq!(dispatcher.drain().await, 1);

        let n = sample(&["realtime"]);
        store.insert(&n).await.unwrap();
        queue.enqueue(n).await;
        assert_eq!(dispatcher.drain().await, 1);
        assert_eq!(dispatcher.drains_started(), 2);
    }
}
