//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `todos` table.
//! - Own timestamp assignment for inserts and updates.
//!
//! # Invariants
//! - Inserts and updates validate their input before touching SQL.
//! - Every update moves `updated_at` strictly forward: it is written as
//!   `MAX(now, updated_at + 1)`, so it never precedes `created_at` even
//!   within one millisecond or when the clock moves backwards.
//! - Lists are ordered by `created_at DESC, id DESC`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::input::{CreateTodoInput, UpdateTodoInput};
use crate::model::todo::{now_epoch_ms, Todo, TodoId, TodoValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    updated_at
FROM todos";

const TODO_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "description",
    "completed",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    /// Inserts a new incomplete record and returns its assigned id.
    fn insert_todo(&self, input: &CreateTodoInput) -> RepoResult<TodoId>;
    /// Writes the supplied fields and refreshes `updated_at`.
    ///
    /// Returns `NotFound` when no row has `input.id`.
    fn update_todo(&self, input: &UpdateTodoInput) -> RepoResult<()>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Lists every record, newest created first.
    fn list_todos(&self) -> RepoResult<Vec<Todo>>;
    /// Hard-deletes one record. Returns whether a row was removed.
    fn delete_todo(&self, id: TodoId) -> RepoResult<bool>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema does
    ///   not carry the `todos` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert_todo(&self, input: &CreateTodoInput) -> RepoResult<TodoId> {
        input.validate()?;

        let now = now_epoch_ms();
        self.conn.execute(
            "INSERT INTO todos (title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, 0, ?3, ?3);",
            params![input.title.as_str(), input.description.as_deref(), now],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_todo(&self, input: &UpdateTodoInput) -> RepoResult<()> {
        input.validate()?;

        let mut assignments = vec!["updated_at = MAX(?, updated_at + 1)"];
        let mut bind_values = vec![Value::Integer(now_epoch_ms())];

        if let Some(title) = input.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }

        if let Some(description) = input.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(match description {
                Some(text) => Value::Text(text.clone()),
                None => Value::Null,
            });
        }

        if let Some(completed) = input.completed {
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        bind_values.push(Value::Integer(input.id));
        let sql = format!("UPDATE todos SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(input.id));
        }

        Ok(())
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row([id], read_raw_row).optional()?;
        row.map(RawTodoRow::into_todo).transpose()
    }

    fn list_todos(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(read_raw_row(row)?.into_todo()?);
        }

        Ok(todos)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

struct RawTodoRow {
    id: TodoId,
    title: String,
    description: Option<String>,
    completed: i64,
    created_at: i64,
    updated_at: i64,
}

impl RawTodoRow {
    fn into_todo(self) -> RepoResult<Todo> {
        let completed = match self.completed {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid completed value `{other}` in todos.completed for id {}",
                    self.id
                )));
            }
        };

        let todo = Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        todo.validate()
            .map_err(|err| RepoError::InvalidData(format!("todo {}: {err}", todo.id)))?;
        Ok(todo)
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawTodoRow> {
    Ok(RawTodoRow {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
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
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
