//! Mobile push delivery.
//!
//! No push provider is wired up yet; the adapter logs and reports success
//! so the dispatch loop exercises the full channel path.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use courier_entity::notification::model::Notification;

use crate::adapter::{names, ChannelAdapter, ChannelError};

/// Placeholder push adapter.
#[derive(Debug, Default)]
pub struct PushAdapter;

impl PushAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChannelAdapter for PushAdapter {
    fn name(&self) -> &'static str {
        names::PUSH
    }

    async fn deliver(
        &self,
        notification: &Notification,
    ) -> Result<serde_json::Value, ChannelError> {
        info!(
            notification_id = %notification.id,
            recipient_key = %notification.recipient_key,
            "Push notification sent"
        );
        Ok(json!({ "delivered": true }))
    }
}
