//! Notification submission: validate, default, route, persist, enqueue.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use courier_channels::resolve_channels;
use courier_core::config::DispatchConfig;
use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_dispatch::DispatchQueue;
use courier_entity::notification::kind::NotificationKind;
use courier_entity::notification::model::{Notification, NotificationMetadata};
use courier_entity::notification::request::NotificationRequest;
use courier_entity::notification::status::NotificationStatus;
use courier_entity::recipient::Recipient;
use courier_store::NotificationStore;

/// Acknowledgement returned to the submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    /// Assigned notification id.
    pub id: Uuid,
    /// Always `"queued"`: the record is persisted and (if due) enqueued.
    pub status: String,
}

/// Ingestion service: turns submissions into persisted, queued records.
pub struct SubmitService {
    store: Arc<dyn NotificationStore>,
    queue: Arc<DispatchQueue>,
    config: DispatchConfig,
}

impl SubmitService {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        queue: Arc<DispatchQueue>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            store,
            queue,
            config,
        }
    }

    /// Submit one notification for a recipient.
    ///
    /// Channel routing runs exactly once, here; the resolved set is
    /// persisted on the record. Persistence failure aborts the submission
    /// and nothing is enqueued. A record scheduled for the future is
    /// persisted but not enqueued.
    pub async fn submit(
        &self,
        recipient: &Recipient,
        request: NotificationRequest,
    ) -> AppResult<SubmitAck> {
        let recipient_key = recipient
            .key()
            .ok_or_else(|| {
                AppError::validation("Recipient must have a user id, email, or phone")
            })?
            .to_string();

        if request.kind.is_empty() {
            return Err(AppError::validation("Notification kind must not be empty"));
        }

        let now = Utc::now();
        let priority = request.priority.unwrap_or_default();
        let kind = NotificationKind::parse(&request.kind);
        let channels = resolve_channels(recipient, priority);

        if channels.is_empty() {
            warn!(
                recipient_key = %recipient_key,
                kind = %request.kind,
                "All channels opted out, notification will fail delivery"
            );
        }

        let defaults = NotificationMetadata::default();
        let metadata = NotificationMetadata {
            source: request.source.unwrap_or(defaults.source),
            category: request.category.unwrap_or(defaults.category),
            tags: request.tags,
            related_entity_id: request.related_entity_id,
            related_entity_type: request.related_entity_type,
        };
        let metadata = serde_json::to_value(&metadata)?;

        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_key,
            kind: request.kind,
            title: request
                .title
                .unwrap_or_else(|| kind.default_title().to_string()),
            message: request.message.unwrap_or_default(),
            data: request.data.unwrap_or_else(|| json!({})),
            resolved_channels: channels,
            delivery_outcomes: None,
            status: NotificationStatus::Pending,
            priority,
            attempts: 0,
            max_attempts: request
                .max_attempts
                .unwrap_or(self.config.default_max_attempts),
            last_error: None,
            read: false,
            read_at: None,
            metadata,
            created_at: now,
            updated_at: now,
            scheduled_for: request.scheduled_for,
            expires_at: request
                .expires_at
                .unwrap_or_else(|| now + priority.default_expiry()),
            sent_at: None,
        };

        self.store.insert(&notification).await?;

        if notification.is_due(now) {
            self.queue.enqueue(notification.clone()).await;
        } else {
            info!(
                notification_id = %notification.id,
                scheduled_for = ?notification.scheduled_for,
                "Notification persisted for future delivery"
            );
        }

        info!(
            notification_id = %notification.id,
            recipient_key = %notification.recipient_key,
            kind = %notification.kind,
            priority = %notification.priority,
            channels = ?notification.resolved_channels,
            "Notification submitted"
        );

        Ok(SubmitAck {
            id: notification.id,
            status: "queued".to_string(),
        })
    }
}
