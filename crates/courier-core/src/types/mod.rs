//! Shared type primitives.

pub mod pagination;
