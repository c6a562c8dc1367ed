//! # courier-channels
//!
//! Delivery channel plumbing: the [`ChannelAdapter`] contract, the four
//! concrete adapters (email, SMS, realtime, push), channel routing, the
//! live connection registry, and message templates.

pub mod adapter;
pub mod email;
pub mod push;
pub mod realtime;
pub mod registry;
pub mod router;
pub mod sms;
pub mod templates;

pub use adapter::{ChannelAdapter, ChannelError, ChannelSet};
pub use email::EmailAdapter;
pub use push::PushAdapter;
pub use realtime::RealtimeAdapter;
pub use registry::{ClientHandle, ConnectionRegistry};
pub use router::resolve_channels;
pub use sms::SmsAdapter;
