//! MoveTask command

use crate::audit::record_change;
use crate::command::{require_task, Applied, Execute};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{AuditAction, BoardState, ColumnId, TaskId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Move a task to a column, optionally at a given position
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveTask {
    /// The task ID to move
    pub id: TaskId,
    /// Target column
    pub column: ColumnId,
    /// Position in the target column; the end when unset or past the end
    pub index: Option<usize>,
}

impl MoveTask {
    /// Move a task to the end of a column
    pub fn to_column(id: impl Into<TaskId>, column: ColumnId) -> Self {
        Self {
            id: id.into(),
            column,
            index: None,
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl Execute for MoveTask {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied> {
        let before = require_task(board, &self.id)?;
        let from = board
            .columns
            .column_of(self.id.as_str())
            .unwrap_or(before.status);

        let mut next = board.clone();
        for column in ColumnId::ALL {
            next.columns.get_mut(column).retain(|id| id != &self.id);
        }
        let target = next.columns.get_mut(self.column);
        let index = self.index.unwrap_or(target.len()).min(target.len());
        target.insert(index, self.id.clone());

        // Reordering inside a column is not an audited change
        if from == self.column {
            debug!(id = %self.id, column = %self.column, index, "reordered task");
            return Ok(Applied {
                board: next,
                task_id: self.id.clone(),
            });
        }

        let mut after = before.clone();
        after.status = self.column;
        next.tasks.insert(after.id.clone(), after.clone());

        let board = record_change(
            &next,
            AuditAction::Move,
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
    use crate::task::test_support::ctx;
    use crate::task::AddTask;
    use crate::types::TaskField;

    /// Board with three todo tasks, top to bottom: c, b, a
    fn setup() -> (BoardState, Vec<TaskId>, BoardContext) {
        let ctx = ctx();
        let mut board = BoardState::empty();
        let mut ids = Vec::new();
        for title in ["Task a", "Task b", "Task c"] {
            let applied = AddTask::new(title).execute(&board, &ctx).unwrap();
            board = applied.board;
            ids.push(applied.task_id);
        }
        (board, ids, ctx)
    }

    #[test]
    fn test_move_task_to_column() {
        let (board, ids, ctx) = setup();
        let applied = MoveTask::to_column(ids[0].clone(), ColumnId::Done)
            .execute(&board, &ctx)
            .unwrap();

        assert_eq!(applied.board.columns.done, vec![ids[0].clone()]);
        assert_eq!(applied.board.tasks[&ids[0]].status, ColumnId::Done);
        let event = &applied.board.audit[0];
        assert_eq!(event.action, AuditAction::Move);
        assert_eq!(event.diff.changed(), &[TaskField::Status]);
        assert!(applied.board.integrity_problems().is_empty());
    }

    #[test]
    fn test_move_at_index() {
        let (board, ids, ctx) = setup();
        let board = MoveTask::to_column(ids[0].clone(), ColumnId::Doing)
            .execute(&board, &ctx)
            .unwrap()
            .board;
        let applied = MoveTask::to_column(ids[1].clone(), ColumnId::Doing)
            .at_index(0)
            .execute(&board, &ctx)
            .unwrap();
        assert_eq!(
            applied.board.columns.doing,
            vec![ids[1].clone(), ids[0].clone()]
        );
    }

    #[test]
    fn test_reorder_within_column_is_not_audited() {
        let (board, ids, ctx) = setup();
        let applied = MoveTask::to_column(ids[2].clone(), ColumnId::Todo)
            .at_index(99)
            .execute(&board, &ctx)
            .unwrap();

        assert_eq!(
            applied.board.columns.todo,
            vec![ids[1].clone(), ids[0].clone(), ids[2].clone()]
        );
        assert_eq!(applied.board.audit.len(), board.audit.len());
    }

    #[test]
    fn test_move_missing_task() {
        let (board, _, ctx) = setup();
        assert!(MoveTask::to_column("ghost", ColumnId::Done)
            .execute(&board, &ctx)
            .is_err());
    }
}
