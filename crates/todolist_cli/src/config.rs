//! Runtime settings resolved from flags, environment and platform paths.

use crate::args::Cli;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use todolist_core::default_log_level;

const DB_FILE_NAME: &str = "todolist.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute. `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            db_path: cli
                .db
                .clone()
                .filter(|path| !path.as_os_str().is_empty())
                .unwrap_or_else(default_db_path),
            log_level: cli
                .log_level
                .clone()
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: cli
                .log_dir
                .as_deref()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map(|dir| absolutize(dir, &cwd)),
        }
    }
}

/// `todolist.sqlite3` in the platform data directory, or the temp directory
/// when that cannot be determined or created.
pub fn default_db_path() -> PathBuf {
    ProjectDirs::from("com", "todolist", "todolist")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .unwrap_or_else(std::env::temp_dir)
        .join(DB_FILE_NAME)
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
