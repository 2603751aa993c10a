//! Cached todo list backing the terminal views.
//!
//! # Responsibility
//! - Hold the local copy of the list and patch it after each mutation.
//! - Derive total/completed/remaining counts from the cached copy.
//!
//! # Invariants
//! - The cache is only patched after the API call succeeds.
//! - A failed call is logged and leaves the cache untouched.
//! - Created records are prepended, keeping newest-first order.

use crate::form::{CreateForm, EditForm};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use todolist_api::{ApiError, DeleteTodoInput, Todo, TodoApi, TodoId, UpdateTodoInput};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCounts {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

#[derive(Debug)]
pub enum BoardError {
    /// Title was blank; nothing was sent.
    BlankTitle,
    /// The id is not in the cached list.
    UnknownRecord(TodoId),
    Api(ApiError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title is required"),
            Self::UnknownRecord(id) => write!(f, "no todo #{id} in the list"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

pub struct TodoBoard {
    api: TodoApi,
    todos: Vec<Todo>,
}

impl TodoBoard {
    pub fn new(api: TodoApi) -> Self {
        Self {
            api,
            todos: Vec::new(),
        }
    }

    pub fn api(&self) -> &TodoApi {
        &self.api
    }

    /// Replaces the cache with a fresh list.
    pub fn load(&mut self) -> Result<(), BoardError> {
        self.todos = self
            .api
            .list_todos()
            .map_err(|err| report("board_load", None, err))?;
        Ok(())
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn counts(&self) -> BoardCounts {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|todo| todo.completed).count();
        BoardCounts {
            total,
            completed,
            remaining: total - completed,
        }
    }

    pub fn create(&mut self, form: &CreateForm) -> Result<&Todo, BoardError> {
        let input = form.to_input().ok_or(BoardError::BlankTitle)?;
        let created = self
            .api
            .create_todo(&input)
            .map_err(|err| report("board_create", None, err))?;
        self.todos.insert(0, created);
        Ok(&self.todos[0])
    }

    /// Flips `completed`, sending only that field.
    pub fn toggle(&mut self, id: TodoId) -> Result<&Todo, BoardError> {
        let completed = self
            .find(id)
            .map(|todo| todo.completed)
            .ok_or(BoardError::UnknownRecord(id))?;
        self.apply_update(&UpdateTodoInput::new(id).with_completed(!completed))
    }

    /// Edit form pre-populated from the cached record.
    pub fn edit_form(&self, id: TodoId) -> Option<EditForm> {
        self.find(id).map(EditForm::from_todo)
    }

    pub fn submit_edit(&mut self, form: &EditForm) -> Result<&Todo, BoardError> {
        let input = form.to_input().ok_or(BoardError::BlankTitle)?;
        self.apply_update(&input)
    }

    /// Sends an update and replaces the cached record with the response.
    ///
    /// A record missing from the cache is inserted where newest-first order
    /// puts it.
    pub fn apply_update(&mut self, input: &UpdateTodoInput) -> Result<&Todo, BoardError> {
        let updated = self
            .api
            .update_todo(input)
            .map_err(|err| report("board_update", Some(input.id), err))?;

        let index = match self.todos.iter().position(|todo| todo.id == updated.id) {
            Some(index) => {
                self.todos[index] = updated;
                index
            }
            None => {
                let index = self
                    .todos
                    .iter()
                    .position(|todo| newest_first_key(todo) < newest_first_key(&updated))
                    .unwrap_or(self.todos.len());
                self.todos.insert(index, updated);
                index
            }
        };
        Ok(&self.todos[index])
    }

    /// Deletes a record and drops it from the cache.
    ///
    /// Returns the server's success flag; the cached copy is removed either
    /// way once the call returns.
    pub fn delete(&mut self, id: TodoId) -> Result<bool, BoardError> {
        let response = self
            .api
            .delete_todo(DeleteTodoInput { id })
            .map_err(|err| report("board_delete", Some(id), err))?;
        self.todos.retain(|todo| todo.id != id);
        Ok(response.success)
    }
}

/// Sort key matching the list order: `created_at DESC, id DESC`.
fn newest_first_key(todo: &Todo) -> (i64, TodoId) {
    (todo.created_at, todo.id)
}

fn report(event: &str, id: Option<TodoId>, err: ApiError) -> BoardError {
    error!(
        "event={} module=ui status=error id={} error_code={}",
        event,
        id.map_or_else(|| "none".to_string(), |id| id.to_string()),
        err.error_code()
    );
    BoardError::Api(err)
}

#[cfg(test)]
mod tests {
    use super::{BoardCounts, BoardError, TodoBoard};
    use crate::form::CreateForm;
    use todolist_api::{ApiError, TodoApi, UpdateTodoInput};

    fn temp_board() -> (tempfile::TempDir, TodoBoard) {
        let dir = tempfile::tempdir().unwrap();
        let board = TodoBoard::new(TodoApi::new(dir.path().join("board.sqlite3")));
        (dir, board)
    }

    #[test]
    fn create_prepends_and_counts_follow_cache() {
        let (_dir, mut board) = temp_board();

        let first = board.create(&CreateForm::new("first", "")).unwrap().id;
        let second = board.create(&CreateForm::new("second", "")).unwrap().id;
        let ids: Vec<_> = board.todos().iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![second, first]);

        board.toggle(first).unwrap();
        assert_eq!(
            board.counts(),
            BoardCounts {
                total: 2,
                completed: 1,
                remaining: 1,
            }
        );
    }

    #[test]
    fn toggle_flips_completed_only() {
        let (_dir, mut board) = temp_board();

        let id = board
            .create(&CreateForm::new("walk", "around the park"))
            .unwrap()
            .id;
        let toggled = board.toggle(id).unwrap().clone();
        assert!(toggled.completed);
        assert_eq!(toggled.title, "walk");
        assert_eq!(toggled.description.as_deref(), Some("around the park"));

        assert!(!board.toggle(id).unwrap().completed);
    }

    #[test]
    fn edit_form_submission_replaces_cached_record() {
        let (_dir, mut board) = temp_board();

        let id = board.create(&CreateForm::new("draft", "old")).unwrap().id;
        let mut form = board.edit_form(id).unwrap();
        form.title = "final".to_string();
        form.description.clear();
        form.completed = true;
        board.submit_edit(&form).unwrap();

        let cached = board.find(id).unwrap();
        assert_eq!(cached.title, "final");
        assert_eq!(cached.description, None);
        assert!(cached.completed);
        assert_eq!(board.todos().len(), 1);
    }

    #[test]
    fn delete_drops_cached_record_and_reports_flag() {
        let (_dir, mut board) = temp_board();

        let keep = board.create(&CreateForm::new("keep", "")).unwrap().id;
        let gone = board.create(&CreateForm::new("gone", "")).unwrap().id;

        assert!(board.delete(gone).unwrap());
        assert!(!board.delete(gone).unwrap());
        assert!(board.find(gone).is_none());
        assert!(board.find(keep).is_some());

        board.load().unwrap();
        assert_eq!(board.todos().len(), 1);
    }

    #[test]
    fn blank_title_and_unknown_ids_never_reach_the_api() {
        let (_dir, mut board) = temp_board();

        assert!(matches!(
            board.create(&CreateForm::new(" ", "")),
            Err(BoardError::BlankTitle)
        ));
        assert!(matches!(board.toggle(4), Err(BoardError::UnknownRecord(4))));
        assert!(board.edit_form(4).is_none());
    }

    #[test]
    fn update_of_uncached_record_lands_in_newest_first_position() {
        let (_dir, mut board) = temp_board();

        let oldest = board.create(&CreateForm::new("oldest", "")).unwrap().id;
        let middle = board.create(&CreateForm::new("middle", "")).unwrap().id;
        let newest = board.create(&CreateForm::new("newest", "")).unwrap().id;

        let mut stale = TodoBoard::new(board.api().clone());
        stale.load().unwrap();
        stale.todos.retain(|todo| todo.id != middle);

        stale
            .apply_update(&UpdateTodoInput::new(middle).with_completed(true))
            .unwrap();
        let ids: Vec<_> = stale.todos().iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![newest, middle, oldest]);
        assert!(stale.find(middle).unwrap().completed);
    }

    #[test]
    fn failed_update_leaves_cache_untouched() {
        let (_dir, mut board) = temp_board();

        let id = board.create(&CreateForm::new("only", "")).unwrap().id;
        let err = board
            .apply_update(&UpdateTodoInput::new(id + 100).with_completed(true))
            .unwrap_err();
        assert!(matches!(err, BoardError::Api(ApiError::NotFound(_))));
        assert_eq!(board.todos().len(), 1);
        assert!(!board.todos()[0].completed);
    }
}
