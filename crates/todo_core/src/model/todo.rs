//! Todo domain model.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `is_done` is always a defined boolean.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a todo record.
pub type TodoId = i64;

/// A single todo record as persisted in the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// May be empty.
    pub description: String,
    pub is_done: bool,
}

impl Todo {
    /// Builds a record that has not been marked done yet.
    pub fn new(id: TodoId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            is_done: false,
        }
    }
}

/// Renders the one-line listing format: `<id>: <title> (<description>) - Done: <is_done>`.
impl Display for Todo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({}) - Done: {}",
            self.id, self.title, self.description, self.is_done
        )
    }
}
