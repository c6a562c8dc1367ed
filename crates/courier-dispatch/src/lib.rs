//! # courier-dispatch
//!
//! The delivery engine: the in-memory FIFO dispatch queue, the processing
//! pass that fans one notification out to its resolved channels, the
//! lifecycle tracker that owns every status write, and the cron scheduler
//! driving periodic drains and expiry reclamation.

pub mod lifecycle;
pub mod processor;
pub mod queue;
pub mod scheduler;

pub use lifecycle::LifecycleTracker;
pub use processor::Dispatcher;
pub use queue::DispatchQueue;
pub use scheduler::DispatchScheduler;
