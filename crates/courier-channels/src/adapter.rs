//! The channel adapter contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use courier_entity::notification::model::Notification;

/// Canonical channel names, in routing order.
pub mod names {
    pub const EMAIL: &str = "email";
    pub const SMS: &str = "sms";
    pub const REALTIME: &str = "realtime";
    pub const PUSH: &str = "push";
}

/// Error from a single channel delivery attempt.
///
/// A channel error fails that channel's outcome only; the dispatch pass
/// continues with the remaining channels.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("email transport is not configured")]
    EmailNotConfigured,

    #[error("SMS provider is not configured")]
    SmsNotConfigured,

    #[error("invalid channel configuration: {0}")]
    Configuration(String),

    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// A delivery transport for one channel.
///
/// `deliver` returns a provider-specific result payload on success. The
/// payload is recorded verbatim in the notification's delivery outcomes.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Canonical channel name this adapter serves.
    fn name(&self) -> &'static str;

    /// Attempt delivery of one notification over this channel.
    async fn deliver(&self, notification: &Notification)
        -> Result<serde_json::Value, ChannelError>;
}

/// The set of installed channel adapters, keyed by channel name.
#[derive(Clone, Default)]
pub struct ChannelSet {
    adapters: HashMap<&'static str, Arc<dyn ChannelAdapter>>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an adapter under its own channel name.
    pub fn with(mut self, adapter: Arc<dyn ChannelAdapter>) -> Self {
        self.adapters.insert(adapter.name(), adapter);
        self
    }

    /// Look up the adapter for a channel name. Unknown names yield `None`;
    /// the caller decides how to skip them.
    pub fn get(&self, channel: &str) -> Option<&Arc<dyn ChannelAdapter>> {
        self.adapters.get(channel)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.adapters.keys().collect();
        names.sort();
        f.debug_struct("ChannelSet").field("channels", &names).finish()
    }
}
