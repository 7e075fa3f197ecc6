//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the six store operations over the `todos` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Every operation attaches its connection to `ExecContext` and checks
//!   for cancellation before issuing SQL; a cancel that interrupts a
//!   running statement also surfaces as `Cancelled`.
//! - Mutations that affect zero rows report `NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::context::ExecContext;
use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::todo::{Todo, TodoId};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT id, title, description, is_done FROM todos";
const TODO_COLUMNS: [&str; 4] = ["id", "title", "description", "is_done"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Store-level error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(TodoId),
    /// The execution context was cancelled before the operation completed.
    Cancelled,
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "todo repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "todo repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "todo repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            return Self::Cancelled;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    fn create_todo(&self, ctx: &ExecContext, title: &str, description: &str) -> RepoResult<Todo>;
    fn list_todos(&self, ctx: &ExecContext) -> RepoResult<Vec<Todo>>;
    fn get_todo(&self, ctx: &ExecContext, id: TodoId) -> RepoResult<Todo>;
    fn update_todo(
        &self,
        ctx: &ExecContext,
        id: TodoId,
        title: &str,
        description: &str,
        is_done: bool,
    ) -> RepoResult<()>;
    fn set_done(&self, ctx: &ExecContext, id: TodoId, is_done: bool) -> RepoResult<()>;
    fn delete_todo(&self, ctx: &ExecContext, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `todos` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin(&self, ctx: &ExecContext) -> RepoResult<()> {
        ctx.attach_interrupt(self.conn.get_interrupt_handle());
        if ctx.is_cancelled() {
            return Err(RepoError::Cancelled);
        }
        Ok(())
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, ctx: &ExecContext, title: &str, description: &str) -> RepoResult<Todo> {
        self.begin(ctx)?;

        self.conn.execute(
            "INSERT INTO todos (title, description, is_done) VALUES (?1, ?2, 0);",
            params![title, description],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=todo_create module=repo status=ok id={id}");

        Ok(Todo::new(id, title, description))
    }

    fn list_todos(&self, ctx: &ExecContext) -> RepoResult<Vec<Todo>> {
        self.begin(ctx)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn get_todo(&self, ctx: &ExecContext, id: TodoId) -> RepoResult<Todo> {
        self.begin(ctx)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_todo_row(row);
        }

        Err(RepoError::NotFound(id))
    }

    fn update_todo(
        &self,
        ctx: &ExecContext,
        id: TodoId,
        title: &str,
        description: &str,
        is_done: bool,
    ) -> RepoResult<()> {
        self.begin(ctx)?;

        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                description = ?2,
                is_done = ?3
             WHERE id = ?4;",
            params![title, description, bool_to_int(is_done), id],
        )?;

        expect_changed(changed, id)
    }

    fn set_done(&self, ctx: &ExecContext, id: TodoId, is_done: bool) -> RepoResult<()> {
        self.begin(ctx)?;

        let changed = self.conn.execute(
            "UPDATE todos SET is_done = ?1 WHERE id = ?2;",
            params![bool_to_int(is_done), id],
        )?;

        expect_changed(changed, id)
    }

    fn delete_todo(&self, ctx: &ExecContext, id: TodoId) -> RepoResult<()> {
        self.begin(ctx)?;

        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        expect_changed(changed, id)
    }
}

fn expect_changed(changed: usize, id: TodoId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound(id));
    }
    Ok(())
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id: TodoId = row.get("id")?;
    let is_done = match row.get::<_, i64>("is_done")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_done value `{other}` in todos.is_done for id {id}"
            )));
        }
    };

    Ok(Todo {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        is_done,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_todo_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }

    for column in TODO_COLUMNS {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|name| name == column))
}
