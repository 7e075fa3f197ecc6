//! Core logic for the `todo` command-line manager.
//! Parsing, execution, and SQLite persistence live here; binaries only wire
//! configuration and process exit status around them.

pub mod command;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use command::{
    decode_args, execute, parse_args, Command, CommandError, ExecError, ExecResult,
};
pub use context::{CancelHandle, ExecContext};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
