//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the todo store contract used by command execution.
//! - Isolate SQLite query details from command dispatch.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Cancelled`) in
//!   addition to DB transport errors.

pub mod todo_repo;
