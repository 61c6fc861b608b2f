//! DeleteTask command

use crate::audit::record_change;
use crate::command::{require_task, Applied, Execute};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{AuditAction, BoardState, ColumnId, TaskId};
use serde::{Deserialize, Serialize};

/// Delete a task and its column placement
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteTask {
    /// The task ID to delete
    pub id: TaskId,
}

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Execute for DeleteTask {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied> {
        let before = require_task(board, &self.id)?;

        let mut next = board.clone();
        next.tasks.shift_remove(&self.id);
        for column in ColumnId::ALL {
            next.columns.get_mut(column).retain(|id| id != &self.id);
        }

        let board = record_change(&next, AuditAction::Delete, &self.id, Some(before), None, ctx);
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

    #[test]
    fn test_delete_task() {
        let ctx = ctx();
        let added = AddTask::new("Short lived")
            .execute(&BoardState::empty(), &ctx)
            .unwrap();
        let applied = DeleteTask::new(added.task_id.clone())
            .execute(&added.board, &ctx)
            .unwrap();

        assert!(applied.board.tasks.is_empty());
        assert!(applied.board.columns.is_empty());
        let event = &applied.board.audit[0];
        assert_eq!(event.action, AuditAction::Delete);
        assert_eq!(
            event.diff.before.as_ref().unwrap().title.as_deref(),
            Some("Short lived")
        );
        assert!(event.diff.after.is_none());
    }

    #[test]
    fn test_delete_missing_task() {
        let err = DeleteTask::new("nope")
            .execute(&BoardState::empty(), &ctx())
            .unwrap_err();
        assert!(matches!(err, BoardError::TaskNotFound { .. }));
    }
}
