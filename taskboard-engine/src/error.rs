//! Error types for the board engine

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Imported snapshot failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stored board could not be read back
    #[error("stored board at {} is corrupt: {message}", path.display())]
    CorruptState { path: PathBuf, message: String },

    /// Another process holds the store lock
    #[error("board is locked by another process: {}", path.display())]
    LockBusy { path: PathBuf },

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a task-not-found error
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    /// True when the error came from user input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound { .. } | Self::InvalidValue { .. } | Self::Validation(_)
        )
    }
}

impl From<figment::Error> for BoardError {
    fn from(error: figment::Error) -> Self {
        Self::Config(Box::new(error))
    }
}

/// One schema violation: where it happened and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path into the document, `(root)` for the top level
    pub path: String,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}: {}", self.path, self.reason)
    }
}

/// An imported snapshot was rejected. Carries every violation, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid board snapshot:\n{}", .issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// A rejection with a single issue at the document root
    pub fn at_root(reason: impl Into<String>) -> Self {
        Self::new(vec![ValidationIssue::new("(root)", reason)])
    }

    /// True when some issue sits at `path`
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::TaskNotFound {
            id: "abc123".into(),
        };
        assert_eq!(err.to_string(), "task not found: abc123");
    }

    #[test]
    fn test_invalid_value() {
        let err = BoardError::invalid_value("title", "must have at least 3 characters");
        assert_eq!(
            err.to_string(),
            "invalid value for title: must have at least 3 characters"
        );
        assert!(err.is_user_error());
    }

    #[test]
    fn test_validation_error_lists_every_issue() {
        let err = ValidationError::new(vec![
            ValidationIssue::new("version", "expected 1"),
            ValidationIssue::new("tasks.a.title", "must have at least 3 characters"),
        ]);
        let text = err.to_string();
        assert!(text.contains("- version: expected 1"));
        assert!(text.contains("- tasks.a.title: must have at least 3 characters"));
        assert!(err.has_issue_at("version"));

        let wrapped: BoardError = err.into();
        assert!(wrapped.is_user_error());
    }

    #[test]
    fn test_io_is_not_user_error() {
        let err = BoardError::Io(std::io::Error::other("disk"));
        assert!(!err.is_user_error());
    }
}
