//! AddTask command

use crate::audit::record_change;
use crate::command::{clean_tags, non_blank, validate_score, validate_title, Applied, Execute};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{AuditAction, BoardState, ColumnId, Priority, Task, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Estimation given to new tasks when none is set
pub const DEFAULT_ESTIMATION_MINUTES: u32 = 30;

/// Add a new task at the top of a column
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTask {
    /// The task title (required, at least 3 characters once trimmed)
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimation_minutes: u32,
    pub due_at: Option<DateTime<Utc>>,
    /// Column the task starts in
    pub column: ColumnId,
    pub rubric_score: Option<f64>,
}

impl AddTask {
    /// Create a new AddTask command with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            tags: Vec::new(),
            estimation_minutes: DEFAULT_ESTIMATION_MINUTES,
            due_at: None,
            column: ColumnId::Todo,
            rubric_score: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_estimation(mut self, minutes: u32) -> Self {
        self.estimation_minutes = minutes;
        self
    }

    pub fn with_due_at(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Set the starting column
    pub fn in_column(mut self, column: ColumnId) -> Self {
        self.column = column;
        self
    }

    pub fn with_rubric_score(mut self, score: f64) -> Self {
        self.rubric_score = Some(score);
        self
    }
}

impl Execute for AddTask {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied> {
        let title = validate_title(&self.title)?;
        let rubric_score = self.rubric_score.map(validate_score).transpose()?;

        let mut task = Task::new(
            TaskId::from_string(ctx.next_id()),
            title,
            self.priority,
            self.column,
            ctx.now(),
        )
        .with_tags(clean_tags(&self.tags))
        .with_estimation(self.estimation_minutes);
        task.description = self.description.as_deref().and_then(non_blank);
        task.due_at = self.due_at;
        task.rubric_score = rubric_score;

        let mut next = board.clone();
        next.columns.get_mut(task.status).insert(0, task.id.clone());
        next.tasks.insert(task.id.clone(), task.clone());
        debug!(id = %task.id, column = %task.status, "added task");

        let board = record_change(&next, AuditAction::Create, &task.id, None, Some(&task), ctx);
        Ok(Applied {
            board,
            task_id: task.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::task::test_support::ctx;
    use crate::types::TaskField;

    #[test]
    fn test_add_task() {
        let ctx = ctx();
        let applied = AddTask::new("  Test task ")
            .with_description("A test task")
            .with_tags(["docs", " ", "review "])
            .execute(&BoardState::empty(), &ctx)
            .unwrap();

        let task = &applied.board.tasks[&applied.task_id];
        assert_eq!(task.title, "Test task");
        assert_eq!(task.tags, vec!["docs", "review"]);
        assert_eq!(task.estimation_minutes, DEFAULT_ESTIMATION_MINUTES);
        assert_eq!(task.created_at, ctx.now());
        assert_eq!(applied.board.columns.todo, vec![applied.task_id.clone()]);

        let event = &applied.board.audit[0];
        assert_eq!(event.action, AuditAction::Create);
        assert_eq!(event.task_id, applied.task_id);
        assert!(event.diff.changed().contains(&TaskField::Description));
    }

    #[test]
    fn test_new_tasks_go_on_top() {
        let ctx = ctx();
        let first = AddTask::new("Task 1")
            .in_column(ColumnId::Doing)
            .execute(&BoardState::empty(), &ctx)
            .unwrap();
        let second = AddTask::new("Task 2")
            .in_column(ColumnId::Doing)
            .execute(&first.board, &ctx)
            .unwrap();

        assert_eq!(
            second.board.columns.doing,
            vec![second.task_id.clone(), first.task_id.clone()]
        );
        assert_eq!(second.board.audit.len(), 2);
        assert!(second.board.integrity_problems().is_empty());
    }

    #[test]
    fn test_short_title_rejected() {
        let board = BoardState::empty();
        let err = AddTask::new("ab").execute(&board, &ctx()).unwrap_err();
        assert!(matches!(err, BoardError::InvalidValue { .. }));
    }

    #[test]
    fn test_rubric_out_of_range_rejected() {
        let err = AddTask::new("Graded task")
            .with_rubric_score(12.0)
            .execute(&BoardState::empty(), &ctx())
            .unwrap_err();
        assert!(err.to_string().contains("rubricScore"));
    }

    #[test]
    fn test_blank_description_dropped() {
        let applied = AddTask::new("Task with blank")
            .with_description("   ")
            .execute(&BoardState::empty(), &ctx())
            .unwrap();
        assert!(applied.board.tasks[&applied.task_id].description.is_none());
    }
}
