//! Schema validation for imported board snapshots
//!
//! Works on the raw JSON value so that every violation can be reported with
//! its path, not only the first one serde would trip over. A snapshot that
//! passes is then deserialized into a `BoardState`.
//!
//! Id collisions and key/id disagreement are left to the reconciler.

use crate::error::{ValidationError, ValidationIssue};
use crate::types::{
    is_uuid_like, AuditAction, BoardState, ColumnId, Priority, TaskField, BOARD_VERSION,
    MIN_TITLE_CHARS, RUBRIC_MAX, USER_LABEL,
};
use chrono::DateTime;
use serde_json::{Map, Value};

/// Validate a raw snapshot and deserialize it
pub fn validate_snapshot(raw: &Value) -> Result<BoardState, ValidationError> {
    let mut validator = SnapshotValidator::default();
    validator.board(raw);

    if !validator.issues.is_empty() {
        return Err(ValidationError::new(validator.issues));
    }

    serde_json::from_value(raw.clone()).map_err(|e| ValidationError::at_root(e.to_string()))
}

/// Task fields are all required, or all optional when checking a diff partial
#[derive(Clone, Copy, PartialEq, Eq)]
enum Presence {
    Full,
    Partial,
}

#[derive(Default)]
struct SnapshotValidator {
    issues: Vec<ValidationIssue>,
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

impl SnapshotValidator {
    fn issue(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.issues.push(ValidationIssue::new(path, reason));
    }

    // =========================================================================
    // Board
    // =========================================================================

    fn board(&mut self, raw: &Value) {
        let Some(root) = raw.as_object() else {
            self.issue("(root)", "expected an object");
            return;
        };

        match root.get("version") {
            Some(v) if v.as_u64() == Some(u64::from(BOARD_VERSION)) => {}
            Some(_) => self.issue("version", format!("expected {}", BOARD_VERSION)),
            None => self.issue("version", "required"),
        }

        match root.get("godMode") {
            Some(Value::Bool(_)) => {}
            Some(_) => self.issue("godMode", "expected a boolean"),
            None => self.issue("godMode", "required"),
        }

        match root.get("tasks") {
            Some(Value::Object(tasks)) => {
                for (key, task) in tasks {
                    self.task(task, &join("tasks", key), Presence::Full);
                }
            }
            Some(_) => self.issue("tasks", "expected an object"),
            None => self.issue("tasks", "required"),
        }

        match root.get("columns") {
            Some(Value::Object(columns)) => {
                for column in ColumnId::ALL {
                    self.string_array(columns, column.as_str(), "columns", true);
                }
            }
            Some(_) => self.issue("columns", "expected an object"),
            None => self.issue("columns", "required"),
        }

        match root.get("audit") {
            Some(Value::Array(events)) => {
                for (index, event) in events.iter().enumerate() {
                    self.event(event, &join("audit", &index.to_string()));
                }
            }
            Some(_) => self.issue("audit", "expected an array"),
            None => self.issue("audit", "required"),
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    fn task(&mut self, value: &Value, path: &str, presence: Presence) {
        let Some(task) = value.as_object() else {
            self.issue(path, "expected an object");
            return;
        };
        let required = presence == Presence::Full;

        match task.get("id") {
            // a missing or empty id falls back to the map key during repair
            None => {}
            Some(Value::String(id)) => {
                if required && !id.is_empty() && !is_uuid_like(id) {
                    self.issue(join(path, "id"), "expected a UUID");
                }
            }
            Some(_) => self.issue(join(path, "id"), "expected a string"),
        }

        match task.get("title") {
            Some(Value::String(title)) if title.chars().count() >= MIN_TITLE_CHARS => {}
            Some(Value::String(_)) => self.issue(
                join(path, "title"),
                format!("must have at least {} characters", MIN_TITLE_CHARS),
            ),
            Some(_) => self.issue(join(path, "title"), "expected a string"),
            None if required => self.issue(join(path, "title"), "required"),
            None => {}
        }

        self.optional_string(task, "description", path);
        self.enum_field(task, "priority", path, required, |s| s.parse::<Priority>().is_ok());
        self.enum_field(task, "status", path, required, |s| s.parse::<ColumnId>().is_ok());
        self.string_array(task, "tags", path, false);

        match task.get("estimationMinutes") {
            Some(v) if v.as_u64().is_some_and(|n| u32::try_from(n).is_ok()) => {}
            Some(_) => self.issue(
                join(path, "estimationMinutes"),
                "expected a non-negative integer",
            ),
            None if required => self.issue(join(path, "estimationMinutes"), "required"),
            None => {}
        }

        self.timestamp(task, "createdAt", path, required);
        self.timestamp(task, "dueAt", path, false);

        match task.get("rubricScore") {
            None => {}
            Some(v) => match v.as_f64() {
                Some(score) if (0.0..=RUBRIC_MAX).contains(&score) => {}
                Some(_) => self.issue(
                    join(path, "rubricScore"),
                    format!("must be between 0 and {}", RUBRIC_MAX),
                ),
                None => self.issue(join(path, "rubricScore"), "expected a number"),
            },
        }

        self.optional_string(task, "rubricComment", path);
        self.optional_string(task, "evaluatorNotes", path);
    }

    // =========================================================================
    // Audit events
    // =========================================================================

    fn event(&mut self, value: &Value, path: &str) {
        let Some(event) = value.as_object() else {
            self.issue(path, "expected an object");
            return;
        };

        // missing or empty event ids are replaced during repair
        self.id_string(event, "id", path, false);
        self.timestamp(event, "timestamp", path, true);
        self.enum_field(event, "action", path, true, |s| s.parse::<AuditAction>().is_ok());
        // board-level events carry an empty task id
        self.id_string(event, "taskId", path, true);

        match event.get("userLabel") {
            Some(Value::String(label)) if label == USER_LABEL => {}
            Some(_) => self.issue(join(path, "userLabel"), format!("expected \"{}\"", USER_LABEL)),
            None => self.issue(join(path, "userLabel"), "required"),
        }

        match event.get("diff") {
            None => {}
            Some(Value::Object(diff)) => self.diff(diff, &join(path, "diff")),
            Some(_) => self.issue(join(path, "diff"), "expected an object"),
        }
    }

    fn diff(&mut self, diff: &Map<String, Value>, path: &str) {
        for side in ["before", "after"] {
            if let Some(partial) = diff.get(side) {
                self.task(partial, &join(path, side), Presence::Partial);
            }
        }

        match diff.get("changedKeys") {
            None => {}
            Some(Value::Array(keys)) => {
                for (index, key) in keys.iter().enumerate() {
                    let known = key.as_str().and_then(TaskField::parse).is_some();
                    if !known {
                        self.issue(
                            join(&join(path, "changedKeys"), &index.to_string()),
                            "expected a task field name",
                        );
                    }
                }
            }
            Some(_) => self.issue(join(path, "changedKeys"), "expected an array"),
        }
    }

    // =========================================================================
    // Field helpers
    // =========================================================================

    fn optional_string(&mut self, obj: &Map<String, Value>, key: &str, path: &str) {
        if let Some(v) = obj.get(key) {
            if !v.is_string() {
                self.issue(join(path, key), "expected a string");
            }
        }
    }

    /// A string that is either empty or a UUID
    fn id_string(&mut self, obj: &Map<String, Value>, key: &str, path: &str, required: bool) {
        match obj.get(key) {
            Some(Value::String(id)) if id.is_empty() || is_uuid_like(id) => {}
            Some(Value::String(_)) => self.issue(join(path, key), "expected a UUID"),
            Some(_) => self.issue(join(path, key), "expected a string"),
            None if required => self.issue(join(path, key), "required"),
            None => {}
        }
    }

    fn enum_field(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
        required: bool,
        accepts: impl Fn(&str) -> bool,
    ) {
        match obj.get(key) {
            Some(Value::String(s)) if accepts(s) => {}
            Some(Value::String(s)) => self.issue(join(path, key), format!("unknown value '{}'", s)),
            Some(_) => self.issue(join(path, key), "expected a string"),
            None if required => self.issue(join(path, key), "required"),
            None => {}
        }
    }

    fn timestamp(&mut self, obj: &Map<String, Value>, key: &str, path: &str, required: bool) {
        match obj.get(key) {
            Some(Value::String(s)) if DateTime::parse_from_rfc3339(s).is_ok() => {}
            Some(_) => self.issue(join(path, key), "expected an RFC 3339 timestamp"),
            None if required => self.issue(join(path, key), "required"),
            None => {}
        }
    }

    fn string_array(&mut self, obj: &Map<String, Value>, key: &str, path: &str, required: bool) {
        match obj.get(key) {
            Some(Value::Array(items)) => {
                for (index, _) in items.iter().enumerate().filter(|(_, v)| !v.is_string()) {
                    self.issue(
                        join(&join(path, key), &index.to_string()),
                        "expected a string",
                    );
                }
            }
            Some(_) => self.issue(join(path, key), "expected an array of strings"),
            None if required => self.issue(join(path, key), "required"),
            None => {}
        }
    }
}
