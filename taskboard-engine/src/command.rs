//! Command plumbing shared by every board mutation
//!
//! A command reads a board snapshot and returns a new one. The input board
//! is never modified, so a failed command leaves the caller's board as is.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::types::{BoardState, Task, TaskId, MIN_TITLE_CHARS, RUBRIC_MAX};

/// The result of a successful command
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub board: BoardState,
    /// The task the command acted on
    pub task_id: TaskId,
}

/// A board mutation
pub trait Execute {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied>;
}

/// Look up a task or fail with `TaskNotFound`
pub(crate) fn require_task<'a>(board: &'a BoardState, id: &TaskId) -> Result<&'a Task> {
    board
        .task(id.as_str())
        .ok_or_else(|| BoardError::task_not_found(id.as_str()))
}

/// Trimmed title of at least the minimum length
pub(crate) fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.chars().count() < MIN_TITLE_CHARS {
        return Err(BoardError::invalid_value(
            "title",
            format!("must have at least {} characters", MIN_TITLE_CHARS),
        ));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_score(score: f64) -> Result<f64> {
    if !(0.0..=RUBRIC_MAX).contains(&score) {
        return Err(BoardError::invalid_value(
            "rubricScore",
            format!("must be between 0 and {}", RUBRIC_MAX),
        ));
    }
    Ok(score)
}

/// Trimmed text, `None` when blank
pub(crate) fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed, non-empty tags in their given order
pub(crate) fn clean_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|t| non_blank(t.as_ref()))
        .collect()
}

/// Split comma-separated tag text, e.g. `"legal, urgent"`
pub fn parse_tags(text: &str) -> Vec<String> {
    clean_tags(text.split(','))
}
