//! Board-level types: BoardState and Columns

use super::audit::AuditEvent;
use super::ids::TaskId;
use super::task::{ColumnId, Task};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Current schema version of the transfer format
pub const BOARD_VERSION: u8 = 1;

/// Ordered task ids for each of the three columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    #[serde(default)]
    pub todo: Vec<TaskId>,
    #[serde(default)]
    pub doing: Vec<TaskId>,
    #[serde(default)]
    pub done: Vec<TaskId>,
}

impl Columns {
    pub fn get(&self, column: ColumnId) -> &[TaskId] {
        match column {
            ColumnId::Todo => &self.todo,
            ColumnId::Doing => &self.doing,
            ColumnId::Done => &self.done,
        }
    }

    pub fn get_mut(&mut self, column: ColumnId) -> &mut Vec<TaskId> {
        match column {
            ColumnId::Todo => &mut self.todo,
            ColumnId::Doing => &mut self.doing,
            ColumnId::Done => &mut self.done,
        }
    }

    /// `(column, ids)` pairs in board order
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &[TaskId])> {
        ColumnId::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// The column that holds `id`, if any
    pub fn column_of(&self, id: &str) -> Option<ColumnId> {
        self.iter()
            .find(|(_, ids)| ids.iter().any(|i| i.as_str() == id))
            .map(|(c, _)| c)
    }

    /// Total number of placed ids
    pub fn len(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The whole board: tasks, column placement, audit history and the god-mode switch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub version: u8,
    pub tasks: IndexMap<TaskId, Task>,
    pub columns: Columns,
    /// Newest first
    pub audit: Vec<AuditEvent>,
    pub god_mode: bool,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoardState {
    /// A board with no tasks and no history
    pub fn empty() -> Self {
        Self {
            version: BOARD_VERSION,
            tasks: IndexMap::new(),
            columns: Columns::default(),
            audit: Vec::new(),
            god_mode: false,
        }
    }

    /// Build a board from tasks, placing each in the column named by its status
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::empty();
        for task in tasks {
            board.columns.get_mut(task.status).push(task.id.clone());
            board.tasks.insert(task.id.clone(), task);
        }
        board
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Copy of the board with the god-mode switch set
    pub fn with_god_mode(&self, enabled: bool) -> Self {
        Self {
            god_mode: enabled,
            ..self.clone()
        }
    }

    /// Describe every broken board invariant. Empty when the board is consistent.
    pub fn integrity_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen: IndexMap<&str, ColumnId> = IndexMap::new();

        for (column, ids) in self.columns.iter() {
            for id in ids {
                if let Some(previous) = seen.insert(id.as_str(), column) {
                    problems.push(format!(
                        "task {} placed in both {} and {}",
                        id, previous, column
                    ));
                }
                match self.tasks.get(id.as_str()) {
                    None => problems.push(format!("column {} references missing task {}", column, id)),
                    Some(task) if task.status != column => problems.push(format!(
                        "task {} has status {} but sits in {}",
                        id, task.status, column
                    )),
                    Some(_) => {}
                }
            }
        }

        for (key, task) in &self.tasks {
            if key != &task.id {
                problems.push(format!("task stored under key {} has id {}", key, task.id));
            }
            if !seen.contains_key(key.as_str()) {
                problems.push(format!("task {} is not placed in any column", key));
            }
        }

        problems
    }
}
