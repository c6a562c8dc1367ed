//! End-to-end dispatch flow: submit, drain, verify lifecycle transitions.

mod helpers;

use chrono::{Duration, Utc};
use courier_entity::notification::outcome::DeliveryOutcome;
use courier_entity::notification::priority::NotificationPriority;
use courier_entity::notification::request::NotificationRequest;
use courier_entity::notification::status::NotificationStatus;
use courier_store::NotificationStore;
use helpers::{full_recipient, user_recipient, TestHarness};

#[tokio::test]
async fn test_submit_and_drain_delivers_to_connected_client() {
    let app = TestHarness::new();
    let (_handle, mut rx) = app.registry.register("user-1");

    let ack = app
        .submit
        .submit(
            &user_recipient("user-1"),
            NotificationRequest::new("approval_required")
                .with_data(serde_json::json!({"title": "Budget increase"})),
        )
        .await
        .unwrap();

    assert_eq!(app.dispatcher.drain().await, 1);

    let stored = app.store.get(ack.id).await.unwrap().unwrap();
    assert_eq!(stored.status, NotificationStatus::Sent);
    assert_eq!(stored.attempts, 1);
    assert!(stored.sent_at.is_some());

    let payload: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(payload["type"], "approval_required");
    assert_eq!(payload["title"], "Approval Required");
}

#[tokio::test]
async fn test_disconnected_recipient_still_counts_as_sent() {
    let app = TestHarness::new();

    let ack = app
        .submit
        .submit(&user_recipient("user-1"), NotificationRequest::new("generic"))
        .await
        .unwrap();
    app.dispatcher.drain().await;

    let stored = app.store.get(ack.id).await.unwrap().unwrap();
    assert_eq!(stored.status, NotificationStatus::Sent);

    let outcomes: Vec<DeliveryOutcome> =
        serde_json::from_value(stored.delivery_outcomes.unwrap()).unwrap();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].result.as_ref().unwrap()["delivered"], false);
    assert_eq!(
        outcomes[0].result.as_ref().unwrap()["reason"],
        "user_not_connected"
    );
}

#[tokio::test]
async fn test_unconfigured_email_fails_its_channel_only() {
    let app = TestHarness::new();

    // Urgent + full contact facts: email, sms, realtime, push all resolved.
    let ack = app
        .submit
        .submit(
            &full_recipient("user-1"),
            NotificationRequest::new("approval_required")
                .with_priority(NotificationPriority::Urgent),
        )
        .await
        .unwrap();
    app.dispatcher.drain().await;

    let stored = app.store.get(ack.id).await.unwrap().unwrap();
    assert_eq!(
        stored.resolved_channels,
        vec!["email", "sms", "realtime", "push"]
    );
    // Email and SMS fail (no transport), realtime and push succeed.
    assert_eq!(stored.status, NotificationStatus::Sent);

    let outcomes: Vec<DeliveryOutcome> =
        serde_json::from_value(stored.delivery_outcomes.unwrap()).unwrap();
    assert_eq!(outcomes.len(), 4);
    assert!(!outcomes[0].success);
    assert!(!outcomes[1].success);
    assert!(outcomes[2].success);
    assert!(outcomes[3].success);
}

#[tokio::test]
async fn test_opted_out_recipient_fails_delivery() {
    let app = TestHarness::new();

    let mut recipient = user_recipient("user-1");
    let mut prefs = std::collections::HashMap::new();
    prefs.insert("realtime".to_string(), false);
    recipient.preferences = Some(prefs);

    let ack = app
        .submit
        .submit(&recipient, NotificationRequest::new("generic"))
        .await
        .unwrap();
    app.dispatcher.drain().await;

    let stored = app.store.get(ack.id).await.unwrap().unwrap();
    assert!(stored.resolved_channels.is_empty());
    // Zero channels means zero successes.
    assert_eq!(stored.status, NotificationStatus::Failed);
    assert_eq!(stored.last_error.as_deref(), Some("no deliverable channels"));
}

#[tokio::test]
async fn test_future_scheduled_submission_is_not_drained() {
    let app = TestHarness::new();

    let mut request = NotificationRequest::new("generic");
    request.scheduled_for = Some(Utc::now() + Duration::hours(1));

    let ack = app
        .submit
        .submit(&user_recipient("user-1"), request)
        .await
        .unwrap();

    assert_eq!(app.dispatcher.drain().await, 0);

    let stored = app.store.get(ack.id).await.unwrap().unwrap();
    assert_eq!(stored.status, NotificationStatus::Pending);
    assert_eq!(stored.attempts, 0);
}

#[tokio::test]
async fn test_reclamation_deletes_expired_but_never_sent() {
    let app = TestHarness::new();

    // Delivered notification, then force its expiry into the past.
    let sent_ack = app
        .submit
        .submit(&user_recipient("user-1"), NotificationRequest::new("generic"))
        .await
        .unwrap();
    app.dispatcher.drain().await;

    // Pending notification already expired at submission.
    let mut expired_request = NotificationRequest::new("generic");
    expired_request.expires_at = Some(Utc::now() - Duration::hours(1));
    expired_request.scheduled_for = Some(Utc::now() + Duration::hours(2));
    let expired_ack = app
        .submit
        .submit(&user_recipient("user-1"), expired_request)
        .await
        .unwrap();

    let deleted = app
        .store
        .delete_expired(Utc::now() + Duration::days(30))
        .await
        .unwrap();

    // Only the pending one goes; sent survives any expiry horizon.
    assert_eq!(deleted, 1);
    assert!(app.store.get(expired_ack.id).await.unwrap().is_none());
    assert!(app.store.get(sent_ack.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_queue_is_emptied_by_drain() {
    let app = TestHarness::new();

    for _ in 0..5 {
        app.submit
            .submit(&user_recipient("user-1"), NotificationRequest::new("generic"))
            .await
            .unwrap();
    }
    assert_eq!(app.queue.len().await, 5);

    assert_eq!(app.dispatcher.drain().await, 5);
    assert!(app.queue.is_empty().await);

    let stats = app.query.statistics(Some("user-1")).await.unwrap();
    assert_eq!(stats.sent, 5);
    assert_eq!(stats.pending, 0);
}
