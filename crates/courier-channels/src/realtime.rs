//! Realtime delivery to live client connections.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use courier_entity::notification::model::Notification;

use crate::adapter::{names, ChannelAdapter, ChannelError};
use crate::registry::ConnectionRegistry;

/// The payload pushed to a connected client.
#[derive(Debug, Serialize)]
pub struct RealtimePayload<'a> {
    pub id: uuid::Uuid,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub data: &'a serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Realtime adapter backed by the connection registry.
///
/// A recipient without a live connection is a successful outcome with
/// `delivered: false`, not a channel failure: the record remains queryable
/// and the client catches up through the query surface.
pub struct RealtimeAdapter {
    registry: Arc<ConnectionRegistry>,
}

impl RealtimeAdapter {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ChannelAdapter for RealtimeAdapter {
    fn name(&self) -> &'static str {
        names::REALTIME
    }

    async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<serde_json::Value, ChannelError> {
        let payload = RealtimePayload {
            id: notification.id,
            kind: &notification.kind,
            title: &notification.title,
            message: &notification.message,
            data: &notification.data,
            timestamp: notification.created_at,
        };
        let serialized = serde_json::to_string(&payload)
            .map_err(|e| ChannelError::Provider(format!("Failed to serialize payload: {e}")))?;

        let delivered = match self.registry.get(&notification.recipient_key) {
            Some(handle) => handle.send(serialized),
            None => false,
        };

        if delivered {
            info!(
                notification_id = %notification.id,
                recipient_key = %notification.recipient_key,
                "Realtime notification sent"
            );
            Ok(json!({ "delivered": true }))
        } else {
            debug!(
                notification_id = %notification.id,
                recipient_key = %notification.recipient_key,
                "Recipient not connected, realtime delivery skipped"
            );
            Ok(json!({ "delivered": false, "reason": "user_not_connected" }))
        }
    }
}
