//! EvaluateTask command: rubric score, rubric comment and evaluator notes

use crate::audit::record_change;
use crate::command::{non_blank, require_task, validate_score, Applied, Execute};
use crate::context::BoardContext;
use crate::error::Result;
use crate::types::{AuditAction, BoardState, TaskId};
use serde::{Deserialize, Serialize};

/// Record an evaluation on a task. Blank comment or notes clear the field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluateTask {
    pub id: TaskId,
    /// Score between 0 and 10
    pub score: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub notes: String,
}

impl EvaluateTask {
    pub fn new(id: impl Into<TaskId>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
            comment: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl Execute for EvaluateTask {
    fn execute(&self, board: &BoardState, ctx: &BoardContext) -> Result<Applied> {
        let before = require_task(board, &self.id)?;
        let score = validate_score(self.score)?;

        let mut after = before.clone();
        after.rubric_score = Some(score);
        after.rubric_comment = non_blank(&self.comment);
        after.evaluator_notes = non_blank(&self.notes);

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
