//! Plain-text rendering of the board and single records.

use crate::board::{BoardCounts, TodoBoard};
use chrono::DateTime;
use todolist_api::Todo;

const EMPTY_STATE: &str = "No todos yet! Create your first todo with `add`.";

pub fn render_board(board: &TodoBoard) -> String {
    let mut out = String::from("My Todo List\n");
    let counts = board.counts();
    if counts.total > 0 {
        out.push_str(&render_counts(counts));
        out.push('\n');
    }
    out.push('\n');

    if board.todos().is_empty() {
        out.push_str(EMPTY_STATE);
        out.push('\n');
        return out;
    }

    for todo in board.todos() {
        out.push_str(&render_todo(todo));
    }
    out
}

pub fn render_counts(counts: BoardCounts) -> String {
    format!(
        "Total: {}  Completed: {}  Remaining: {}",
        counts.total, counts.completed, counts.remaining
    )
}

/// One record: status line, optional description, dates.
pub fn render_todo(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    let mut out = format!("[{mark}] #{} {}\n", todo.id, todo.title);
    if let Some(description) = todo.description.as_deref().filter(|text| !text.is_empty()) {
        for line in description.lines() {
            out.push_str(&format!("      {line}\n"));
        }
    }
    out.push_str(&format!("      Created: {}", format_date(todo.created_at)));
    if todo.was_updated() {
        out.push_str(&format!("  Updated: {}", format_date(todo.updated_at)));
    }
    out.push('\n');
    out
}

fn format_date(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
