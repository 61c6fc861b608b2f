//! Task types: Task, Priority, ColumnId, TaskField, TaskPatch

use super::ids::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Upper bound of the evaluation rubric
pub const RUBRIC_MAX: f64 = 10.0;

/// Minimum title length, in characters
pub const MIN_TITLE_CHARS: usize = 3;

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown priority '{}'", s))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three workflow columns. A task's `status` is the column it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    Doing,
    Done,
}

impl ColumnId {
    /// Columns in board order
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Doing, ColumnId::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::Todo => "todo",
            ColumnId::Doing => "doing",
            ColumnId::Done => "done",
        }
    }
}

impl FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown column '{}'", s))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task/card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Empty only in snapshots awaiting repair
    #[serde(default)]
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimation_minutes: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub status: ColumnId,

    // Evaluation fields. They persist while god mode is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator_notes: Option<String>,
}

impl Task {
    /// Create a new task with the required fields; everything optional starts empty
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        priority: Priority,
        status: ColumnId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            priority,
            tags: Vec::new(),
            estimation_minutes: 0,
            created_at,
            due_at: None,
            status,
            rubric_score: None,
            rubric_comment: None,
            evaluator_notes: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    /// Fields that carry a value, in enumeration order
    pub fn present_fields(&self) -> Vec<TaskField> {
        TaskField::ALL
            .into_iter()
            .filter(|f| self.field_value(*f).is_some())
            .collect()
    }

    /// JSON value of a single field, `None` when the field is absent
    pub fn field_value(&self, field: TaskField) -> Option<Value> {
        fn json<T: Serialize>(v: &T) -> Option<Value> {
            serde_json::to_value(v).ok()
        }

        match field {
            TaskField::Id => json(&self.id),
            TaskField::Title => json(&self.title),
            TaskField::Description => self.description.as_ref().and_then(json),
            TaskField::Priority => json(&self.priority),
            TaskField::Tags => json(&self.tags),
            TaskField::EstimationMinutes => json(&self.estimation_minutes),
            TaskField::CreatedAt => json(&self.created_at),
            TaskField::DueAt => self.due_at.as_ref().and_then(json),
            TaskField::Status => json(&self.status),
            TaskField::RubricScore => self.rubric_score.as_ref().and_then(json),
            TaskField::RubricComment => self.rubric_comment.as_ref().and_then(json),
            TaskField::EvaluatorNotes => self.evaluator_notes.as_ref().and_then(json),
        }
    }

    /// True when neither a rubric comment nor evaluator notes hold text
    pub fn has_no_notes(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().is_none_or(|v| v.trim().is_empty());
        blank(&self.rubric_comment) && blank(&self.evaluator_notes)
    }
}

/// Names of task fields, in enumeration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskField {
    Id,
    Title,
    Description,
    Priority,
    Tags,
    EstimationMinutes,
    CreatedAt,
    DueAt,
    Status,
    RubricScore,
    RubricComment,
    EvaluatorNotes,
}

impl TaskField {
    pub const ALL: [TaskField; 12] = [
        TaskField::Id,
        TaskField::Title,
        TaskField::Description,
        TaskField::Priority,
        TaskField::Tags,
        TaskField::EstimationMinutes,
        TaskField::CreatedAt,
        TaskField::DueAt,
        TaskField::Status,
        TaskField::RubricScore,
        TaskField::RubricComment,
        TaskField::EvaluatorNotes,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskField::Id => "id",
            TaskField::Title => "title",
            TaskField::Description => "description",
            TaskField::Priority => "priority",
            TaskField::Tags => "tags",
            TaskField::EstimationMinutes => "estimationMinutes",
            TaskField::CreatedAt => "createdAt",
            TaskField::DueAt => "dueAt",
            TaskField::Status => "status",
            TaskField::RubricScore => "rubricScore",
            TaskField::RubricComment => "rubricComment",
            TaskField::EvaluatorNotes => "evaluatorNotes",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        TaskField::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A partial task: only the fields that took part in a change are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimation_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluator_notes: Option<String>,
}

impl TaskPatch {
    /// Full snapshot of a task
    pub fn from_task(task: &Task) -> Self {
        let mut patch = Self::default();
        for field in TaskField::ALL {
            patch.copy_field(task, field);
        }
        patch
    }

    /// Patch holding only an id
    pub fn id_only(id: TaskId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Copy one field from `task`. An absent optional field stays absent.
    pub fn copy_field(&mut self, task: &Task, field: TaskField) {
        match field {
            TaskField::Id => self.id = Some(task.id.clone()),
            TaskField::Title => self.title = Some(task.title.clone()),
            TaskField::Description => self.description = task.description.clone(),
            TaskField::Priority => self.priority = Some(task.priority),
            TaskField::Tags => self.tags = Some(task.tags.clone()),
            TaskField::EstimationMinutes => self.estimation_minutes = Some(task.estimation_minutes),
            TaskField::CreatedAt => self.created_at = Some(task.created_at),
            TaskField::DueAt => self.due_at = task.due_at,
            TaskField::Status => self.status = Some(task.status),
            TaskField::RubricScore => self.rubric_score = task.rubric_score,
            TaskField::RubricComment => self.rubric_comment = task.rubric_comment.clone(),
            TaskField::EvaluatorNotes => self.evaluator_notes = task.evaluator_notes.clone(),
        }
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
