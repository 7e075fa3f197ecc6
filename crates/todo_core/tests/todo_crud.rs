use rusqlite::{Connection, ErrorCode};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use todo_core::db::migrations::latest_version;
use todo_core::db::open_db_in_memory;
use todo_core::{ExecContext, RepoError, SqliteTodoRepository, Todo, TodoRepository};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    let created = repo.create_todo(&ctx, "Buy milk", "2%").unwrap();
    assert!(!created.is_done);
    assert_eq!(created.title, "Buy milk");

    let loaded = repo.get_todo(&ctx, created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_assigns_fresh_unique_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    let first = repo.create_todo(&ctx, "a", "").unwrap();
    let second = repo.create_todo(&ctx, "b", "").unwrap();
    repo.delete_todo(&ctx, second.id).unwrap();
    let third = repo.create_todo(&ctx, "c", "").unwrap();

    assert_eq!(first.id, 1);
    assert_ne!(first.id, second.id);
    assert!(third.id > second.id, "deleted ids must not be reused");
}

#[test]
fn set_done_keeps_title_and_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    let created = repo.create_todo(&ctx, "Walk dog", "twice").unwrap();
    repo.set_done(&ctx, created.id, true).unwrap();

    let loaded = repo.get_todo(&ctx, created.id).unwrap();
    assert!(loaded.is_done);
    assert_eq!(loaded.title, "Walk dog");
    assert_eq!(loaded.description, "twice");
}

#[test]
fn update_replaces_all_mutable_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    let created = repo.create_todo(&ctx, "draft", "old").unwrap();
    repo.update_todo(&ctx, created.id, "final", "", true).unwrap();

    let loaded = repo.get_todo(&ctx, created.id).unwrap();
    assert_eq!(
        loaded,
        Todo {
            id: created.id,
            title: "final".to_string(),
            description: String::new(),
            is_done: true,
        }
    );

    repo.update_todo(&ctx, created.id, "final", "", false).unwrap();
    assert!(!repo.get_todo(&ctx, created.id).unwrap().is_done);
}

#[test]
fn delete_then_get_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    let created = repo.create_todo(&ctx, "temp", "").unwrap();
    repo.delete_todo(&ctx, created.id).unwrap();

    let err = repo.get_todo(&ctx, created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn mutations_on_missing_id_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    assert!(matches!(
        repo.update_todo(&ctx, 404, "t", "d", false),
        Err(RepoError::NotFound(404))
    ));
    assert!(matches!(
        repo.set_done(&ctx, 404, true),
        Err(RepoError::NotFound(404))
    ));
    assert!(matches!(
        repo.delete_todo(&ctx, 404),
        Err(RepoError::NotFound(404))
    ));
}

#[test]
fn list_returns_every_added_todo_once_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    assert!(repo.list_todos(&ctx).unwrap().is_empty());

    let mut created_ids = Vec::new();
    for index in 0..5 {
        let todo = repo
            .create_todo(&ctx, &format!("todo {index}"), "")
            .unwrap();
        created_ids.push(todo.id);
    }

    let listed = repo.list_todos(&ctx).unwrap();
    let listed_ids: Vec<_> = listed.iter().map(|todo| todo.id).collect();
    assert_eq!(listed_ids, created_ids);

    let unique: HashSet<_> = listed_ids.iter().collect();
    assert_eq!(unique.len(), 5);
}

#[test]
fn cancelled_context_fails_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let live = ExecContext::background();
    let created = repo.create_todo(&live, "keep", "me").unwrap();

    let cancelled = ExecContext::background();
    cancelled.cancel_handle().cancel();

    assert!(matches!(
        repo.create_todo(&cancelled, "new", ""),
        Err(RepoError::Cancelled)
    ));
    assert!(matches!(
        repo.delete_todo(&cancelled, created.id),
        Err(RepoError::Cancelled)
    ));
    assert!(matches!(repo.list_todos(&cancelled), Err(RepoError::Cancelled)));

    let remaining = repo.list_todos(&live).unwrap();
    assert_eq!(remaining, vec![created]);
}

#[test]
fn store_call_attaches_connection_so_cancel_interrupts_running_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();
    repo.list_todos(&ctx).unwrap();

    let finished = Arc::new(AtomicBool::new(false));
    let canceller = {
        let handle = ctx.cancel_handle();
        let finished = Arc::clone(&finished);
        thread::spawn(move || {
            while !finished.load(Ordering::Acquire) {
                handle.cancel();
                thread::sleep(Duration::from_millis(10));
            }
        })
    };

    let result = conn.query_row(
        "WITH RECURSIVE counter(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM counter)
         SELECT COUNT(*) FROM counter;",
        [],
        |row| row.get::<_, i64>(0),
    );
    finished.store(true, Ordering::Release);
    canceller.join().unwrap();

    let err = result.unwrap_err();
    assert_eq!(err.sqlite_error_code(), Some(ErrorCode::OperationInterrupted));
    assert!(matches!(RepoError::from(err), RepoError::Cancelled));
    assert!(matches!(repo.list_todos(&ctx), Err(RepoError::Cancelled)));
}

#[test]
fn read_rejects_invalid_is_done_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let ctx = ExecContext::background();

    // Bypass the CHECK constraint the way a foreign writer with an older schema could.
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO todos (title, description, is_done) VALUES ('bad', '', 2);",
    )
    .unwrap();

    let err = repo.list_todos(&ctx).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTodoRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTodoRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("todos"))
    ));
}

#[test]
fn repository_rejects_connection_missing_is_done_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTodoRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "todos",
            column: "is_done"
        })
    ));
}
