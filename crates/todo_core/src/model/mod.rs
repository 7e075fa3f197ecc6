//! Domain model for the todo store.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
