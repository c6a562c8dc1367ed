//! Notification entity: record model, status/priority/kind enums,
//! delivery outcomes, and submission request types.

pub mod kind;
pub mod model;
pub mod outcome;
pub mod priority;
pub mod request;
pub mod status;

pub use kind::NotificationKind;
pub use model::{Notification, NotificationMetadata};
pub use outcome::DeliveryOutcome;
pub use priority::NotificationPriority;
pub use request::NotificationRequest;
pub use status::NotificationStatus;
