//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by store and service layers.
//!
//! # Invariants
//! - Task ids come from the persisted counter, never from the collection.
//! - Collection order is insertion order.

pub mod task;
