//! Live connection registry for realtime delivery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use courier_core::config::RealtimeConfig;

/// A handle to one live client connection.
///
/// Holds the sender half of the outbound message channel plus connection
/// metadata. The transport layer owns the receiver half.
#[derive(Debug)]
pub struct ClientHandle {
    /// Unique connection id.
    pub id: Uuid,
    /// Recipient key this connection serves.
    pub recipient_key: String,
    /// Sender for serialized outbound payloads.
    sender: mpsc::Sender<String>,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Whether the connection is still alive.
    alive: AtomicBool,
}

impl ClientHandle {
    fn new(recipient_key: String, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_key,
            sender,
            connected_at: Utc::now(),
            alive: AtomicBool::new(true),
        }
    }

    /// Push a serialized payload to the client without blocking.
    ///
    /// Returns `false` when the buffer is full or the connection has gone
    /// away; a full buffer drops the message rather than stalling dispatch.
    pub fn send(&self, payload: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(payload) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Connection send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Registry of live client connections, keyed by recipient key.
///
/// At most one connection per recipient key: registering a key that is
/// already present replaces the previous connection.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, Arc<ClientHandle>>,
    config: RealtimeConfig,
}

impl ConnectionRegistry {
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            connections: DashMap::new(),
            config,
        }
    }

    /// Register a connection for a recipient key.
    ///
    /// Returns the handle and the receiver half the transport layer drains.
    pub fn register(&self, recipient_key: &str) -> (Arc<ClientHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ClientHandle::new(recipient_key.to_string(), tx));

        if let Some(previous) = self
            .connections
            .insert(recipient_key.to_string(), handle.clone())
        {
            previous.mark_dead();
            debug!(
                recipient_key = %recipient_key,
                old_conn_id = %previous.id,
                "Replaced existing connection"
            );
        }

        info!(
            conn_id = %handle.id,
            recipient_key = %recipient_key,
            "Client connection registered"
        );

        (handle, rx)
    }

    /// Remove a connection, but only if the given handle is still the one
    /// registered for its key. A stale handle (already replaced) is ignored.
    pub fn unregister(&self, handle: &ClientHandle) {
        let removed = self
            .connections
            .remove_if(&handle.recipient_key, |_, current| current.id == handle.id);

        if removed.is_some() {
            handle.mark_dead();
            info!(
                conn_id = %handle.id,
                recipient_key = %handle.recipient_key,
                "Client connection unregistered"
            );
        }
    }

    /// Look up the live connection for a recipient key.
    pub fn get(&self, recipient_key: &str) -> Option<Arc<ClientHandle>> {
        self.connections
            .get(recipient_key)
            .map(|entry| entry.value().clone())
    }

    /// Whether a recipient currently has a live connection.
    pub fn is_connected(&self, recipient_key: &str) -> bool {
        self.connections.contains_key(recipient_key)
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
