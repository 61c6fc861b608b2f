//! UpdateTask command

use crate::audit::record_change;
use crate::command::{clean_tags, non_blank, require_task, validate_title, Applied, Execute};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{AuditAction, BoardState, Priority, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Update an existing task's editable fields
///
/// Column placement is not touched here; see [`MoveTask`](crate::task::MoveTask).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTask {
    /// The task ID to update
    pub id: TaskId,
    pub title: Option<String>,
    /// None = don't change, Some(None) = clear, Some(Some(x)) = set
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    /// Replace all tags
    pub tags: Option<Vec<String>>,
    pub estimation_minutes: Option<u32>,
    /// None = don't change, Some(None) = clear, Some(Some(x)) = set
    pub due_at: Option<Option<DateTime<Utc>>>,
}

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            priority: None,
            tags: None,
            estimation_minutes: None,
            due_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set or clear the description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the tags (replaces all existing tags)
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_estimation(mut self, minutes: u32) -> Self {
        self.estimation_minutes = Some(minutes);
        self
    }

    /// Set or clear the due date
    pub fn with_due_at(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

impl Execute for UpdateTask {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied> {
        let before = require_task(board, &self.id)?;
        let mut after = before.clone();

        if let Some(title) = &self.title {
            after.title = validate_title(title)?;
        }
        if let Some(description) = &self.description {
            after.description = description.as_deref().and_then(non_blank);
        }
        if let Some(priority) = self.priority {
            after.priority = priority;
        }
        if let Some(tags) = &self.tags {
            after.tags = clean_tags(tags);
        }
        if let Some(minutes) = self.estimation_minutes {
            after.estimation_minutes = minutes;
        }
        if let Some(due_at) = self.due_at {
            after.due_at = due_at;
        }

        let mut next = board.clone();
        next.tasks.insert(after.id.clone(), after.clone());

        let board = record_change(
            &next,
            AuditAction::Update,
            &self.id,
            Some(before),
            Some(&after),
            ctx,
        );
        Ok(Applied {
            board,
            task_id: self.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::task::test_support::ctx;
    use crate::task::AddTask;
    use crate::types::TaskField;
    use chrono::TimeZone;

    fn setup() -> (BoardState, TaskId, BoardContext) {
        let ctx = ctx();
        let applied = AddTask::new("Original")
            .with_description("Some words")
            .execute(&BoardState::empty(), &ctx)
            .unwrap();
        (applied.board, applied.task_id, ctx)
    }

    #[test]
    fn test_update_title_and_tags() {
        let (board, id, ctx) = setup();
        let applied = UpdateTask::new(id.clone())
            .with_title("Renamed")
            .with_tags(vec!["a".into(), "b".into()])
            .execute(&board, &ctx)
            .unwrap();

        let task = &applied.board.tasks[&id];
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.tags, vec!["a", "b"]);
        assert_eq!(
            applied.board.audit[0].diff.changed(),
            &[TaskField::Title, TaskField::Tags]
        );
        // input board untouched
        assert_eq!(board.tasks[&id].title, "Original");
    }

    #[test]
    fn test_clear_description_and_set_due() {
        let (board, id, ctx) = setup();
        let due = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let applied = UpdateTask::new(id.clone())
            .with_description(None)
            .with_due_at(Some(due))
            .execute(&board, &ctx)
            .unwrap();

        let task = &applied.board.tasks[&id];
        assert!(task.description.is_none());
        assert_eq!(task.due_at, Some(due));
        let diff = &applied.board.audit[0].diff;
        assert_eq!(diff.changed(), &[TaskField::Description, TaskField::DueAt]);
        assert_eq!(diff.before.as_ref().unwrap().description.as_deref(), Some("Some words"));
    }

    #[test]
    fn test_noop_update_logs_empty_diff() {
        let (board, id, ctx) = setup();
        let applied = UpdateTask::new(id).execute(&board, &ctx).unwrap();
        assert_eq!(applied.board.audit.len(), 2);
        assert_eq!(applied.board.audit[0].action, AuditAction::Update);
        assert!(applied.board.audit[0].diff.is_empty());
    }

    #[test]
    fn test_update_missing_task() {
        let (board, _, ctx) = setup();
        let err = UpdateTask::new("missing").execute(&board, &ctx).unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound { .. }));
    }

    #[test]
    fn test_invalid_title_leaves_board_alone() {
        let (board, id, ctx) = setup();
        let result = UpdateTask::new(id).with_title("x").execute(&board, &ctx);
        assert!(result.is_err());
        assert_eq!(board.audit.len(), 1);
    }
}
