//! Audit types: AuditEvent, AuditAction, AuditDiff

use super::ids::{AuditEventId, TaskId};
use super::task::{TaskField, TaskPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label stamped on every audit event. The board has a single user.
pub const USER_LABEL: &str = "Alumno/a";

/// Kind of operation an audit event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Move,
    Import,
    Export,
    ImportFix,
}

impl AuditAction {
    pub const ALL: [AuditAction; 7] = [
        AuditAction::Create,
        AuditAction::Update,
        AuditAction::Delete,
        AuditAction::Move,
        AuditAction::Import,
        AuditAction::Export,
        AuditAction::ImportFix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Move => "MOVE",
            AuditAction::Import => "IMPORT",
            AuditAction::Export => "EXPORT",
            AuditAction::ImportFix => "IMPORT_FIX",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown audit action '{}'", s))
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after delta of a task mutation. Only changed fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<TaskPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<TaskPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_keys: Option<Vec<TaskField>>,
}

impl AuditDiff {
    /// The diff with no members
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.changed_keys.is_none()
    }

    /// Diff recording an identity change from `from` to `to`
    pub fn id_change(from: TaskId, to: TaskId) -> Self {
        Self {
            before: Some(TaskPatch::id_only(from)),
            after: Some(TaskPatch::id_only(to)),
            changed_keys: Some(vec![TaskField::Id]),
        }
    }

    /// Changed field names, empty when nothing changed
    pub fn changed(&self) -> &[TaskField] {
        self.changed_keys.as_deref().unwrap_or(&[])
    }
}

/// An immutable record of one action on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    #[serde(default)]
    pub id: AuditEventId,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    /// Affected task; empty for board-level events (import, export)
    #[serde(default)]
    pub task_id: TaskId,
    #[serde(default)]
    pub diff: AuditDiff,
    pub user_label: String,
}
