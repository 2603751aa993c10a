//! Interactive board session.
//!
//! Reads one command per line, runs form prompts for `add` and `edit`, asks
//! for confirmation before `delete`, and re-renders the board after every
//! successful mutation. Failed actions are reported and abandoned.

use crate::board::TodoBoard;
use crate::form::CreateForm;
use crate::render::{render_board, render_todo};
use std::io::{self, BufRead, Write};
use todolist_api::TodoId;

const HELP: &str = "Commands:
  list            show the board
  add             create a todo
  toggle <id>     flip completed
  edit <id>       edit title, description and completed
  delete <id>     delete a todo (asks first)
  help            show this message
  quit            leave
";

enum Flow {
    Continue,
    Quit,
}

/// Runs the session until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    board: &mut TodoBoard,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    if let Err(err) = board.load() {
        writeln!(output, "Failed to load todos: {err}")?;
    }
    write!(output, "{}", render_board(board))?;

    loop {
        let Some(line) = prompt(&mut input, &mut output, "> ")? else {
            return Ok(());
        };
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next();

        let flow = match command {
            "" => Flow::Continue,
            "list" | "ls" => {
                write!(output, "{}", render_board(board))?;
                Flow::Continue
            }
            "add" => add(board, &mut input, &mut output)?,
            "toggle" | "done" => with_id(argument, &mut output, |id, output| {
                match board.toggle(id).map(|_| ()) {
                    Ok(()) => write!(output, "{}", render_board(board)),
                    Err(err) => writeln!(output, "Failed to toggle todo: {err}"),
                }
            })?,
            "edit" => match parse_id(argument) {
                Some(id) => edit(board, id, &mut input, &mut output)?,
                None => usage(&mut output)?,
            },
            "delete" | "rm" => match parse_id(argument) {
                Some(id) => delete(board, id, &mut input, &mut output)?,
                None => usage(&mut output)?,
            },
            "help" => {
                write!(output, "{HELP}")?;
                Flow::Continue
            }
            "quit" | "exit" | "q" => Flow::Quit,
            other => {
                writeln!(output, "Unknown command `{other}`. Type `help`.")?;
                Flow::Continue
            }
        };

        if let Flow::Quit = flow {
            return Ok(());
        }
    }
}

fn add<R: BufRead, W: Write>(
    board: &mut TodoBoard,
    input: &mut R,
    output: &mut W,
) -> io::Result<Flow> {
    let Some(title) = prompt(input, output, "Title: ")? else {
        return Ok(Flow::Quit);
    };
    let Some(description) = prompt(input, output, "Description (optional): ")? else {
        return Ok(Flow::Quit);
    };

    match board.create(&CreateForm::new(title, description)).map(|_| ()) {
        Ok(()) => write!(output, "{}", render_board(board))?,
        Err(err) => writeln!(output, "Failed to create todo: {err}")?,
    }
    Ok(Flow::Continue)
}

fn edit<R: BufRead, W: Write>(
    board: &mut TodoBoard,
    id: TodoId,
    input: &mut R,
    output: &mut W,
) -> io::Result<Flow> {
    let Some(mut form) = board.edit_form(id) else {
        writeln!(output, "No todo #{id} in the list.")?;
        return Ok(Flow::Continue);
    };

    let Some(title) = prompt(input, output, &format!("Title [{}]: ", form.title))? else {
        return Ok(Flow::Quit);
    };
    if !title.is_empty() {
        form.title = title;
    }

    let Some(description) = prompt(
        input,
        output,
        &format!("Description [{}] (- to clear): ", form.description),
    )?
    else {
        return Ok(Flow::Quit);
    };
    match description.as_str() {
        "" => {}
        "-" => form.description.clear(),
        _ => form.description = description,
    }

    let current = if form.completed { "y" } else { "n" };
    let Some(completed) = prompt(input, output, &format!("Completed [{current}] (y/n): "))? else {
        return Ok(Flow::Quit);
    };
    match completed.to_ascii_lowercase().as_str() {
        "y" | "yes" => form.completed = true,
        "n" | "no" => form.completed = false,
        _ => {}
    }

    match board.submit_edit(&form) {
        Ok(todo) => write!(output, "Updated:\n{}", render_todo(todo))?,
        Err(err) => writeln!(output, "Failed to update todo: {err}")?,
    }
    Ok(Flow::Continue)
}

fn delete<R: BufRead, W: Write>(
    board: &mut TodoBoard,
    id: TodoId,
    input: &mut R,
    output: &mut W,
) -> io::Result<Flow> {
    let Some(title) = board.find(id).map(|todo| todo.title.clone()) else {
        writeln!(output, "No todo #{id} in the list.")?;
        return Ok(Flow::Continue);
    };

    let question = format!("Delete \"{title}\"? This action cannot be undone. [y/N]: ");
    let Some(answer) = prompt(input, output, &question)? else {
        return Ok(Flow::Quit);
    };
    if !confirmed(&answer) {
        writeln!(output, "Cancelled.")?;
        return Ok(Flow::Continue);
    }

    match board.delete(id) {
        Ok(_) => write!(output, "{}", render_board(board))?,
        Err(err) => writeln!(output, "Failed to delete todo: {err}")?,
    }
    Ok(Flow::Continue)
}

/// Whether a confirmation answer means yes.
pub fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prints `label` and reads one line without its trailing newline.
/// `None` at end of input.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn parse_id(argument: Option<&str>) -> Option<TodoId> {
    argument.and_then(|value| value.trim_start_matches('#').parse().ok())
}

fn with_id<W: Write>(
    argument: Option<&str>,
    output: &mut W,
    action: impl FnOnce(TodoId, &mut W) -> io::Result<()>,
) -> io::Result<Flow> {
    match parse_id(argument) {
        Some(id) => action(id, output)?,
        None => {
            usage(output)?;
        }
    }
    Ok(Flow::Continue)
}

fn usage<W: Write>(output: &mut W) -> io::Result<Flow> {
    writeln!(output, "Expected a todo id, e.g. `toggle 3`.")?;
    Ok(Flow::Continue)
}
