//! # courier-store
//!
//! The durable notification store: the [`NotificationStore`] contract
//! consumed by dispatch and query services, a PostgreSQL implementation
//! backed by sqlx, and an in-memory implementation for tests and
//! storeless deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use memory::MemoryNotificationStore;
pub use postgres::PgNotificationStore;
pub use store::{NotificationQuery, NotificationStats, NotificationStore, NotificationUpdate};
