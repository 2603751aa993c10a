use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todolist_api::TodoId;

#[derive(Parser, Debug)]
#[command(name = "todolist")]
#[command(about = "Keep a list of todos in a local SQLite file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "TODOLIST_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "TODOLIST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Write rolling log files into this directory
    #[arg(long, global = true, env = "TODOLIST_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive board (default)
    Shell,

    /// List todos, newest first
    #[command(alias = "ls")]
    List,

    /// Show one todo
    Get { id: TodoId },

    /// Create a todo
    #[command(alias = "new")]
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Flip a todo between done and not done
    Toggle { id: TodoId },

    /// Change fields of a todo
    Edit {
        id: TodoId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description
        #[arg(long)]
        clear_description: bool,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete a todo
    #[command(alias = "rm")]
    Delete {
        id: TodoId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
