//! Process-level wiring for the `todo` and `createdb` binaries.

pub mod app;
pub mod config;

pub use app::{bootstrap_db, run_todo, AppError, Outcome};
pub use config::CliConfig;
