//! One CLI invocation: parse, open the store, execute, report.
//!
//! # Invariants
//! - Arguments are parsed before the database is opened, so parse-stage
//!   failures never create or touch the database file.
//! - The connection lives only for the duration of one call and is dropped
//!   on every return path.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::Path;
use todo_core::db::migrations::latest_version;
use todo_core::db::{open_db, schema_version, DbError};
use todo_core::{execute, parse_args, ExecContext, ExecError, RepoError, SqliteTodoRepository};

/// How an invocation ended when it did not fail fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran against the store.
    Completed,
    /// Parsing failed; the message was printed and the store was not opened.
    Rejected,
}

/// Fatal failure after parsing succeeded.
#[derive(Debug)]
pub enum AppError {
    Db(DbError),
    Repo(RepoError),
    Exec(ExecError),
    Output(std::io::Error),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open database: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Exec(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Exec(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExecError> for AppError {
    fn from(value: ExecError) -> Self {
        Self::Exec(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Runs one `todo` invocation.
///
/// `args` excludes the program name. Parse errors are written to `out` and
/// reported as `Outcome::Rejected`; everything after parsing is fatal.
pub fn run_todo<S: AsRef<str>>(
    args: &[S],
    db_path: &Path,
    ctx: &ExecContext,
    out: &mut impl Write,
) -> Result<Outcome, AppError> {
    let command = match parse_args(args) {
        Ok(command) => command,
        Err(err) => {
            warn!("event=command_parse module=cli status=rejected error={err}");
            writeln!(out, "{err}")?;
            return Ok(Outcome::Rejected);
        }
    };

    let conn = open_db(db_path)?;
    let repo = SqliteTodoRepository::try_new(&conn)?;
    execute(&command, &repo, ctx, out)?;
    Ok(Outcome::Completed)
}

/// Creates or migrates the database at `db_path` and returns its schema version.
pub fn bootstrap_db(db_path: &Path) -> Result<u32, AppError> {
    let conn = open_db(db_path)?;
    let version = schema_version(&conn)?;
    info!(
        "event=db_bootstrap module=cli status=ok schema_version={} latest={}",
        version,
        latest_version()
    );
    Ok(version)
}
