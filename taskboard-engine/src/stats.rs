//! Evaluation statistics over a board

use crate::types::BoardState;
use serde::Serialize;

/// How far evaluation of the board has progressed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricSummary {
    pub total: usize,
    pub evaluated: usize,
    pub pending: usize,
    /// Mean rubric score of evaluated tasks, `None` when nothing is evaluated
    pub average_score: Option<f64>,
}

impl RubricSummary {
    pub fn from_board(board: &BoardState) -> Self {
        let scores: Vec<f64> = board.tasks.values().filter_map(|t| t.rubric_score).collect();
        let average_score =
            (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

        Self {
            total: board.tasks.len(),
            evaluated: scores.len(),
            pending: board.tasks.len() - scores.len(),
            average_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnId, Priority, Task, TaskId};
    use chrono::Utc;

    fn task(id: &str, score: Option<f64>) -> Task {
        let mut task = Task::new(TaskId::from(id), "Scored task", Priority::Low, ColumnId::Done, Utc::now());
        task.rubric_score = score;
        task
    }

    #[test]
    fn test_summary() {
        let board = BoardState::from_tasks([task("a", Some(8.0)), task("b", Some(5.0)), task("c", None)]);
        let summary = RubricSummary::from_board(&board);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.evaluated, 2);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.average_score, Some(6.5));
    }

    #[test]
    fn test_empty_board_has_no_average() {
        let summary = RubricSummary::from_board(&BoardState::empty());
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.pending, 0);
    }
}
