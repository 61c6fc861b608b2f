//! Error type for CLI commands

use std::path::PathBuf;
use taskboard_engine::{BoardError, ValidationError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("import rejected:\n{0}")]
    Import(#[from] ValidationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a board already exists at {} (use --force to replace it)", path.display())]
    BoardExists { path: PathBuf },

    #[error("invalid date '{input}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate { input: String },

    #[error("{action} {}: {source}", path.display())]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}
