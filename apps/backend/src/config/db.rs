use std::env;

use crate::error::AppError;

/// Default SQLite file for the profile store.
pub const DEFAULT_DB_FILE: &str = "database.db";

/// Where the profile store lives.
#[derive(Debug, Clone, PartialEq)]
pub enum DbProfile {
    /// Ephemeral SQLite database, gone when the process exits.
    InMemory,
    /// SQLite file; `None` uses `SHED_DB_FILE` or [`DEFAULT_DB_FILE`].
    SqliteFile { file: Option<String> },
}

impl DbProfile {
    /// Read `SHED_DB` (`memory` | `file`, default `file`).
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("SHED_DB")
            .unwrap_or_else(|_| "file".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => Ok(DbProfile::InMemory),
            "file" => Ok(DbProfile::SqliteFile { file: None }),
            other => Err(AppError::config(format!(
                "SHED_DB must be 'memory' or 'file', got '{other}'"
            ))),
        }
    }
}

/// Builds a SQLite connection URL for the profile.
pub fn db_url(profile: &DbProfile) -> String {
    match profile {
        DbProfile::InMemory => "sqlite::memory:".to_string(),
        DbProfile::SqliteFile { file } => {
            let path = file
                .clone()
                .or_else(|| env::var("SHED_DB_FILE").ok())
                .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());
            // rwc: create the file on first start
            format!("sqlite://{path}?mode=rwc")
        }
    }
}
