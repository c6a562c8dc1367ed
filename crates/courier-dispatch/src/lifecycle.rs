//! Lifecycle tracking: the single writer of notification status.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use courier_entity::notification::outcome::DeliveryOutcome;
use courier_entity::notification::status::NotificationStatus;
use courier_store::{NotificationStore, NotificationUpdate};

/// Applies post-pass status transitions to the store.
///
/// Every `pending -> sent` / `pending -> failed` write in the system goes
/// through here. Store failures are logged and swallowed: the in-memory
/// outcome of a pass is already final, and a lost status write must not
/// take the drain loop down with it.
pub struct LifecycleTracker {
    store: Arc<dyn NotificationStore>,
}

impl LifecycleTracker {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Record the per-channel outcomes of one completed processing pass.
    ///
    /// Status becomes `sent` when at least one channel succeeded, `failed`
    /// when every channel failed (or none were resolved). `sent_at` marks
    /// pass completion in both cases.
    pub async fn record_outcomes(
        &self,
        id: Uuid,
        outcomes: &[DeliveryOutcome],
        attempts: i32,
    ) {
        let any_success = outcomes.iter().any(|o| o.success);
        let status = if any_success {
            NotificationStatus::Sent
        } else {
            NotificationStatus::Failed
        };

        let serialized = match serde_json::to_value(outcomes) {
            Ok(v) => Some(v),
            Err(e) => {
                error!(notification_id = %id, error = %e, "Failed to serialize delivery outcomes");
                None
            }
        };

        let update = NotificationUpdate {
            status: Some(status),
            delivery_outcomes: serialized,
            sent_at: Some(Utc::now()),
            attempts: Some(attempts),
            last_error: None,
        };

        if let Err(e) = self.store.apply(id, update).await {
            error!(
                notification_id = %id,
                error = %e,
                "Failed to persist delivery outcome"
            );
            return;
        }

        info!(
            notification_id = %id,
            status = %status,
            channels = outcomes.len(),
            "Notification processed"
        );
    }

    /// Record a whole-pass failure: the pass itself broke before producing
    /// per-channel outcomes.
    pub async fn record_pass_failure(&self, id: Uuid, error_message: &str, attempts: i32) {
        let update = NotificationUpdate {
            status: Some(NotificationStatus::Failed),
            delivery_outcomes: None,
            sent_at: Some(Utc::now()),
            attempts: Some(attempts),
            last_error: Some(error_message.to_string()),
        };

        if let Err(e) = self.store.apply(id, update).await {
            error!(
                notification_id = %id,
                error = %e,
                "Failed to persist pass failure"
            );
        }
    }
}
