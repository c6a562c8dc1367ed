//! # courier-service
//!
//! Service surface: notification submission (validation, defaulting,
//! routing, persistence, enqueue) and the recipient-facing query surface
//! (listing, read marking, statistics).

pub mod query;
pub mod submit;

pub use query::QueryService;
pub use submit::{SubmitAck, SubmitService};
