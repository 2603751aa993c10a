//! `todolist` terminal front end.
//!
//! Without a subcommand it opens the interactive board; the subcommands run
//! one action and exit.

mod args;
mod board;
mod config;
mod form;
mod render;
mod shell;

use args::{Cli, Command};
use board::{BoardError, TodoBoard};
use clap::Parser;
use config::Settings;
use form::CreateForm;
use log::{info, warn};
use std::io::{self, Write};
use std::process::ExitCode;
use todolist_api::{GetTodoInput, TodoApi, TodoId, UpdateTodoInput};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli);

    if let Some(log_dir) = &settings.log_dir {
        if let Err(err) = todolist_core::init_logging(&settings.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }
    info!(
        "event=app_start module=cli status=ok core_version={}",
        todolist_core::core_version()
    );

    let mut board = TodoBoard::new(TodoApi::new(settings.db_path));
    let outcome = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let stdin = io::stdin();
            shell::run_shell(&mut board, stdin.lock(), io::stdout()).map_err(CliError::Io)
        }
        Command::List => list(&mut board),
        Command::Get { id } => get(&board, id),
        Command::Add { title, description } => add(&mut board, title, description),
        Command::Toggle { id } => toggle(&mut board, id),
        Command::Edit {
            id,
            title,
            description,
            clear_description,
            completed,
        } => {
            let mut input = UpdateTodoInput::new(id);
            if let Some(title) = title {
                input = input.with_title(title);
            }
            if clear_description {
                input = input.with_description(None);
            } else if let Some(description) = description {
                input = input.with_description(Some(description));
            }
            if let Some(completed) = completed {
                input = input.with_completed(completed);
            }
            edit(&mut board, &input)
        }
        Command::Delete { id, yes } => delete(&mut board, id, yes),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!("event=app_exit module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
enum CliError {
    Board(BoardError),
    Io(io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
        }
    }
}

impl From<BoardError> for CliError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type CliResult = Result<(), CliError>;

fn list(board: &mut TodoBoard) -> CliResult {
    board.load()?;
    print!("{}", render::render_board(board));
    Ok(())
}

fn get(board: &TodoBoard, id: TodoId) -> CliResult {
    let found = board
        .api()
        .get_todo(GetTodoInput { id })
        .map_err(BoardError::Api)?;
    match found {
        Some(todo) => print!("{}", render::render_todo(&todo)),
        None => println!("Todo #{id} not found."),
    }
    Ok(())
}

fn add(board: &mut TodoBoard, title: String, description: Option<String>) -> CliResult {
    let form = CreateForm::new(title, description.unwrap_or_default());
    let created = board.create(&form)?;
    print!("Created:\n{}", render::render_todo(created));
    Ok(())
}

fn toggle(board: &mut TodoBoard, id: TodoId) -> CliResult {
    board.load()?;
    let toggled = board.toggle(id)?;
    print!("{}", render::render_todo(toggled));
    Ok(())
}

fn edit(board: &mut TodoBoard, input: &UpdateTodoInput) -> CliResult {
    if input.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(BoardError::BlankTitle.into());
    }
    let updated = board.apply_update(input)?;
    print!("Updated:\n{}", render::render_todo(updated));
    Ok(())
}

fn delete(board: &mut TodoBoard, id: TodoId, yes: bool) -> CliResult {
    if !yes {
        board.load()?;
        let Some(title) = board.find(id).map(|todo| todo.title.clone()) else {
            println!("Todo #{id} not found.");
            return Ok(());
        };

        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let question = format!("Delete \"{title}\"? This action cannot be undone. [y/N]: ");
        let answer = shell::prompt(&mut stdin.lock(), &mut stdout, &question)?;
        if !answer.as_deref().is_some_and(shell::confirmed) {
            writeln!(stdout, "Cancelled.")?;
            return Ok(());
        }
    }

    if board.delete(id)? {
        println!("Deleted todo #{id}.");
    } else {
        println!("Todo #{id} not found.");
    }
    Ok(())
}
