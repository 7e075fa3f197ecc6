//! Command executor.
//!
//! # Invariants
//! - Exactly one repository call per command.
//! - Nothing is written for a command whose store call failed.

use super::Command;
use crate::context::ExecContext;
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::time::Instant;

pub type ExecResult<T> = Result<T, ExecError>;

/// Failure while running an already-parsed command.
#[derive(Debug)]
pub enum ExecError {
    Repo(RepoError),
    Output(std::io::Error),
}

impl Display for ExecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for ExecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RepoError> for ExecError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for ExecError {
    fn from(value: std::io::Error) -> Self {
        Self::Output(value)
    }
}

/// Runs `command` against `repo` and writes the human-readable result to `out`.
///
/// # Errors
/// - `ExecError::Repo` when the store call fails (including `NotFound` and
///   `Cancelled`); nothing is written in that case.
/// - `ExecError::Output` when writing to `out` fails.
pub fn execute<R, W>(
    command: &Command,
    repo: &R,
    ctx: &ExecContext,
    out: &mut W,
) -> ExecResult<()>
where
    R: TodoRepository + ?Sized,
    W: Write + ?Sized,
{
    let started_at = Instant::now();
    let result = run(command, repo, ctx, out);
    match &result {
        Ok(()) => info!(
            "event=command_exec module=command status=ok command={} duration_ms={}",
            command.name(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=command_exec module=command status=error command={} duration_ms={} error={}",
            command.name(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn run<R, W>(command: &Command, repo: &R, ctx: &ExecContext, out: &mut W) -> ExecResult<()>
where
    R: TodoRepository + ?Sized,
    W: Write + ?Sized,
{
    match command {
        Command::Add { title, description } => {
            repo.create_todo(ctx, title, description)?;
            writeln!(out, "Todo added")?;
        }
        Command::List => {
            let todos = repo.list_todos(ctx)?;
            for todo in &todos {
                writeln!(out, "{todo}")?;
            }
        }
        Command::Get { id } => {
            let todo = repo.get_todo(ctx, *id)?;
            writeln!(out, "{todo}")?;
        }
        Command::Update {
            id,
            title,
            description,
            is_done,
        } => {
            repo.update_todo(ctx, *id, title, description, *is_done)?;
            writeln!(out, "Todo updated")?;
        }
        Command::Delete { id } => {
            repo.delete_todo(ctx, *id)?;
            writeln!(out, "Todo deleted")?;
        }
        Command::Done { id } => {
            repo.set_done(ctx, *id, true)?;
            writeln!(out, "Todo marked as done")?;
        }
    }
    Ok(())
}
