//! # courier-entity
//!
//! Domain entity models for Courier: the notification record, its status
//! and priority enumerations, per-channel delivery outcomes, and the
//! recipient descriptor used for channel routing.

pub mod notification;
pub mod recipient;

pub use notification::model::Notification;
pub use recipient::Recipient;
