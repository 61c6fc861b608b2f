//! Structural diff between two versions of a task

use crate::types::{AuditDiff, Task, TaskField, TaskPatch};

/// Compute the field-level delta between `before` and `after`.
///
/// - create (`after` only): full snapshot of `after`, every present field listed
/// - delete (`before` only): full snapshot of `before`, every present field listed
/// - update: only changed fields, in field enumeration order
///
/// An unchanged task (or two absent ones) yields the empty diff.
pub fn compute_diff(before: Option<&Task>, after: Option<&Task>) -> AuditDiff {
    match (before, after) {
        (None, None) => AuditDiff::empty(),
        (None, Some(created)) => AuditDiff {
            before: None,
            after: Some(TaskPatch::from_task(created)),
            changed_keys: Some(created.present_fields()),
        },
        (Some(deleted), None) => AuditDiff {
            before: Some(TaskPatch::from_task(deleted)),
            after: None,
            changed_keys: Some(deleted.present_fields()),
        },
        (Some(old), Some(new)) => diff_versions(old, new),
    }
}

fn diff_versions(old: &Task, new: &Task) -> AuditDiff {
    let changed: Vec<TaskField> = TaskField::ALL
        .into_iter()
        .filter(|field| old.field_value(*field) != new.field_value(*field))
        .collect();

    if changed.is_empty() {
        return AuditDiff::empty();
    }

    let mut before = TaskPatch::default();
    let mut after = TaskPatch::default();
    for field in &changed {
        before.copy_field(old, *field);
        after.copy_field(new, *field);
    }

    AuditDiff {
        before: Some(before),
        after: Some(after),
        changed_keys: Some(changed),
    }
}
