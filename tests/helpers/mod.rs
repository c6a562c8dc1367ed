//! Shared test helpers for integration tests.

use std::sync::Arc;

use courier_channels::{
    ChannelSet, ConnectionRegistry, EmailAdapter, PushAdapter, RealtimeAdapter, SmsAdapter,
};
use courier_core::config::{DispatchConfig, RealtimeConfig};
use courier_dispatch::{DispatchQueue, Dispatcher, LifecycleTracker};
use courier_entity::recipient::Recipient;
use courier_service::{QueryService, SubmitService};
use courier_store::MemoryNotificationStore;

/// Fully wired dispatch stack over the in-memory store.
///
/// Matches the production wiring: all four adapters installed, email and
/// SMS left unconfigured so their deliveries fail the way they do on a
/// box without transport credentials.
pub struct TestHarness {
    pub store: Arc<MemoryNotificationStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub queue: Arc<DispatchQueue>,
    pub dispatcher: Arc<Dispatcher>,
    pub submit: SubmitService,
    pub query: QueryService,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryNotificationStore::new());
        let registry = Arc::new(ConnectionRegistry::new(RealtimeConfig::default()));

        let channels = ChannelSet::new()
            .with(Arc::new(
                EmailAdapter::new(None).expect("email adapter init"),
            ))
            .with(Arc::new(SmsAdapter::new(None)))
            .with(Arc::new(RealtimeAdapter::new(Arc::clone(&registry))))
            .with(Arc::new(PushAdapter::new()));

        let queue = Arc::new(DispatchQueue::new());
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&queue),
            channels,
            LifecycleTracker::new(store.clone()),
        ));

        let submit = SubmitService::new(
            store.clone(),
            Arc::clone(&queue),
            DispatchConfig::default(),
        );
        let query = QueryService::new(store.clone());

        Self {
            store,
            registry,
            queue,
            dispatcher,
            submit,
            query,
        }
    }
}

/// Recipient with a user id only: routes to realtime alone.
pub fn user_recipient(user_id: &str) -> Recipient {
    Recipient {
        user_id: Some(user_id.to_string()),
        ..Default::default()
    }
}

/// Recipient with every contact fact present.
pub fn full_recipient(user_id: &str) -> Recipient {
    Recipient {
        user_id: Some(user_id.to_string()),
        email: Some(format!("{user_id}@example.com")),
        phone: Some("+15550001".to_string()),
        device_token: Some("device-token".to_string()),
        preferences: None,
    }
}
