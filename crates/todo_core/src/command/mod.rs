//! Command dispatch: typed subcommands parsed from CLI arguments and their
//! execution against the todo store.
//!
//! # Responsibility
//! - Turn raw arguments into exactly one validated `Command`.
//! - Run a `Command` with one store call and render its console output.
//!
//! # Invariants
//! - Parse-stage failures never reach the store.
//! - Every `Command` variant maps to exactly one `TodoRepository` call.

use crate::model::todo::TodoId;

mod execute;
mod parse;

pub use execute::{execute, ExecError, ExecResult};
pub use parse::{decode_args, parse_args, parse_bool, parse_id, usage_text, CommandError};

pub const ADD_USAGE: &str = "add <title> <description>";
pub const LIST_USAGE: &str = "list";
pub const GET_USAGE: &str = "get <id>";
pub const UPDATE_USAGE: &str = "update <id> <title> <description> <is_done>";
pub const DELETE_USAGE: &str = "delete <id>";
pub const DONE_USAGE: &str = "done <id>";

/// One parsed subcommand with its validated payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        title: String,
        description: String,
    },
    List,
    Get {
        id: TodoId,
    },
    Update {
        id: TodoId,
        title: String,
        description: String,
        is_done: bool,
    },
    Delete {
        id: TodoId,
    },
    Done {
        id: TodoId,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::List => "list",
            Self::Get { .. } => "get",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Done { .. } => "done",
        }
    }
}
