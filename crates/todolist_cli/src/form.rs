//! Create and edit forms.
//!
//! Forms hold raw text as typed by the user and turn it into API input.
//! A blank description is sent as `null`; a blank title is refused without
//! issuing a request.

use todolist_api::{CreateTodoInput, Todo, TodoId, UpdateTodoInput};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub title: String,
    pub description: String,
}

impl CreateForm {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// `None` when the title is blank.
    pub fn to_input(&self) -> Option<CreateTodoInput> {
        if self.title.trim().is_empty() {
            return None;
        }
        Some(CreateTodoInput::new(
            self.title.clone(),
            non_empty(&self.description),
        ))
    }
}

/// Edit form pre-populated from a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl EditForm {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            completed: todo.completed,
        }
    }

    /// Update carrying title, description and completed. `None` when the
    /// title is blank.
    pub fn to_input(&self) -> Option<UpdateTodoInput> {
        if self.title.trim().is_empty() {
            return None;
        }
        Some(
            UpdateTodoInput::new(self.id)
                .with_title(self.title.clone())
                .with_description(non_empty(&self.description))
                .with_completed(self.completed),
        )
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
