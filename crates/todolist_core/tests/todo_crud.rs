use rusqlite::{params, Connection};
use todolist_core::db::migrations::latest_version;
use todolist_core::db::open_db_in_memory;
use todolist_core::{
    CreateTodoInput, RepoError, SqliteTodoRepository, TodoRepository, UpdateTodoInput,
};

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_todo(&CreateTodoInput::new("first", Some("details".to_string())))
        .unwrap();

    let loaded = repo.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, "first");
    assert_eq!(loaded.description.as_deref(), Some("details"));
    assert!(!loaded.completed);
    assert_eq!(loaded.created_at, loaded.updated_at);
}

#[test]
fn ids_are_assigned_incrementally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = repo.insert_todo(&CreateTodoInput::new("a", None)).unwrap();
    let second = repo.insert_todo(&CreateTodoInput::new("b", None)).unwrap();
    assert!(second > first);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = repo.insert_todo(&CreateTodoInput::new("a", None)).unwrap();
    assert!(repo.delete_todo(first).unwrap());
    let second = repo.insert_todo(&CreateTodoInput::new("b", None)).unwrap();
    assert_ne!(first, second);
}

#[test]
fn update_writes_only_supplied_fields_and_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_todo(&CreateTodoInput::new("keep", Some("also keep".to_string())))
        .unwrap();
    backdate(&conn, id, 1_000);

    repo.update_todo(&UpdateTodoInput::new(id).with_completed(true))
        .unwrap();

    let loaded = repo.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded.title, "keep");
    assert_eq!(loaded.description.as_deref(), Some("also keep"));
    assert!(loaded.completed);
    assert_eq!(loaded.created_at, 1_000);
    assert!(loaded.updated_at > 1_000);
}

#[test]
fn update_with_null_description_clears_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo
        .insert_todo(&CreateTodoInput::new("t", Some("remove me".to_string())))
        .unwrap();
    repo.update_todo(&UpdateTodoInput::new(id).with_description(None))
        .unwrap();

    let loaded = repo.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded.description, None);
}

#[test]
fn updated_at_never_precedes_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo.insert_todo(&CreateTodoInput::new("t", None)).unwrap();
    let future = i64::MAX / 2;
    backdate(&conn, id, future);

    repo.update_todo(&UpdateTodoInput::new(id).with_title("renamed"))
        .unwrap();

    let loaded = repo.get_todo(id).unwrap().unwrap();
    assert_eq!(loaded.updated_at, future + 1);
    assert!(loaded.updated_at > loaded.created_at);
    assert_eq!(loaded.title, "renamed");
}

#[test]
fn back_to_back_updates_keep_moving_updated_at_forward() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let id = repo.insert_todo(&CreateTodoInput::new("t", None)).unwrap();
    let mut previous = repo.get_todo(id).unwrap().unwrap().updated_at;
    for round in 0..50 {
        repo.update_todo(&UpdateTodoInput::new(id).with_completed(round % 2 == 0))
            .unwrap();
        let current = repo.get_todo(id).unwrap().unwrap().updated_at;
        assert!(current > previous, "round {round}: {current} <= {previous}");
        previous = current;
    }
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo
        .update_todo(&UpdateTodoInput::new(999).with_completed(true))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(999)));
}

#[test]
fn validation_failure_blocks_insert_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let insert_err = repo.insert_todo(&CreateTodoInput::new("", None)).unwrap_err();
    assert!(matches!(insert_err, RepoError::Validation(_)));

    let id = repo.insert_todo(&CreateTodoInput::new("ok", None)).unwrap();
    let update_err = repo
        .update_todo(&UpdateTodoInput::new(id).with_title(""))
        .unwrap_err();
    assert!(matches!(update_err, RepoError::Validation(_)));
    assert_eq!(repo.get_todo(id).unwrap().unwrap().title, "ok");
}

#[test]
fn list_orders_by_created_at_then_id_descending() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let a = repo.insert_todo(&CreateTodoInput::new("a", None)).unwrap();
    let b = repo.insert_todo(&CreateTodoInput::new("b", None)).unwrap();
    let c = repo.insert_todo(&CreateTodoInput::new("c", None)).unwrap();
    backdate(&conn, a, 3_000);
    backdate(&conn, b, 1_000);
    backdate(&conn, c, 1_000);

    let ids: Vec<_> = repo
        .list_todos()
        .unwrap()
        .into_iter()
        .map(|todo| todo.id)
        .collect();
    assert_eq!(ids, vec![a, c, b]);
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    assert!(repo.list_todos().unwrap().is_empty());
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let keep = repo.insert_todo(&CreateTodoInput::new("keep", None)).unwrap();
    let drop_id = repo.insert_todo(&CreateTodoInput::new("drop", None)).unwrap();

    assert!(repo.delete_todo(drop_id).unwrap());
    assert!(!repo.delete_todo(drop_id).unwrap());
    assert!(repo.get_todo(drop_id).unwrap().is_none());
    assert_eq!(repo.get_todo(keep).unwrap().unwrap().title, "keep");
}

#[test]
fn read_path_rejects_invalid_completed_value() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        INSERT INTO todos (title, description, completed, created_at, updated_at)
        VALUES ('broken', NULL, 7, 1, 1);
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.list_todos().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)), "{err}");
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

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(result, Err(RepoError::MissingRequiredTable("todos"))));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE todos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL
        );
        PRAGMA user_version = {};",
        latest_version()
    ))
    .unwrap();

    let result = SqliteTodoRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todos",
            column: "updated_at"
        })
    ));
}

fn backdate(conn: &Connection, id: i64, at: i64) {
    conn.execute(
        "UPDATE todos SET created_at = ?2, updated_at = ?2 WHERE id = ?1;",
        params![id, at],
    )
    .unwrap();
}
