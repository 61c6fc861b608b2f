//! Audit log: event construction and the append-only history

use crate::context::BoardContext;
use crate::diff::compute_diff;
use crate::reconcile::IdRemap;
use crate::types::{
    AuditAction, AuditDiff, AuditEvent, AuditEventId, BoardState, Task, TaskId, USER_LABEL,
};
use tracing::debug;

/// Build an event with a fresh id, the current time and the fixed user label
pub fn create_event(
    action: AuditAction,
    task_id: TaskId,
    diff: AuditDiff,
    ctx: &BoardContext,
) -> AuditEvent {
    AuditEvent {
        id: AuditEventId::from_string(ctx.next_id()),
        timestamp: ctx.now(),
        action,
        task_id,
        diff,
        user_label: USER_LABEL.to_string(),
    }
}

/// New board with `event` at the head of the history
pub fn append(board: &BoardState, event: AuditEvent) -> BoardState {
    let mut audit = Vec::with_capacity(board.audit.len() + 1);
    audit.push(event);
    audit.extend(board.audit.iter().cloned());
    BoardState {
        audit,
        ..board.clone()
    }
}

/// Record a task mutation: diff the two versions and append the event
pub fn record_change(
    board: &BoardState,
    action: AuditAction,
    task_id: &TaskId,
    before: Option<&Task>,
    after: Option<&Task>,
    ctx: &BoardContext,
) -> BoardState {
    let diff = compute_diff(before, after);
    debug!(%action, task = %task_id, changed = diff.changed().len(), "recording change");
    append(board, create_event(action, task_id.clone(), diff, ctx))
}

/// One `UPDATE` event per identity repair, in remap order
pub fn fix_events(remaps: &[IdRemap], ctx: &BoardContext) -> Vec<AuditEvent> {
    remaps
        .iter()
        .map(|remap| {
            create_event(
                AuditAction::Update,
                remap.to.clone(),
                AuditDiff::id_change(remap.from.clone(), remap.to.clone()),
                ctx,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FixedClock, SequentialIds};
    use crate::types::{ColumnId, Priority, TaskField};
    use chrono::{TimeZone, Utc};

    fn ctx() -> BoardContext {
        BoardContext::default()
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()))
            .with_ids(SequentialIds::new())
    }

    #[test]
    fn test_create_event_stamps_context() {
        let ctx = ctx();
        let event = create_event(AuditAction::Create, "t1".into(), AuditDiff::empty(), &ctx);
        assert_eq!(event.id.as_str(), "00000000-0000-0000-0000-000000000001");
        assert_eq!(event.timestamp, ctx.now());
        assert_eq!(event.user_label, USER_LABEL);
    }

    #[test]
    fn test_append_prepends_without_touching_input() {
        let ctx = ctx();
        let board = BoardState::empty();
        let create = create_event(AuditAction::Create, "a".into(), AuditDiff::empty(), &ctx);
        let first = append(&board, create);
        let delete = create_event(AuditAction::Delete, "a".into(), AuditDiff::empty(), &ctx);
        let second = append(&first, delete);

        assert!(board.audit.is_empty());
        assert_eq!(first.audit.len(), 1);
        assert_eq!(second.audit[0].action, AuditAction::Delete);
        assert_eq!(second.audit[1], first.audit[0]);
    }

    #[test]
    fn test_record_change_carries_diff() {
        let ctx = ctx();
        let old = Task::new("t1".into(), "Old title", Priority::Low, ColumnId::Todo, ctx.now());
        let new = Task {
            title: "New title".into(),
            ..old.clone()
        };
        let board = record_change(
            &BoardState::empty(),
            AuditAction::Update,
            &old.id,
            Some(&old),
            Some(&new),
            &ctx,
        );
        let event = &board.audit[0];
        assert_eq!(event.task_id, old.id);
        assert_eq!(event.diff.changed(), &[TaskField::Title]);
    }

    #[test]
    fn test_fix_events_record_id_change() {
        let ctx = ctx();
        let remaps = vec![
            IdRemap {
                from: "x".into(),
                to: "n1".into(),
            },
            IdRemap {
                from: "y".into(),
                to: "n2".into(),
            },
        ];
        let events = fix_events(&remaps, &ctx);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::Update);
        assert_eq!(events[0].task_id.as_str(), "n1");
        assert_eq!(events[1].diff, AuditDiff::id_change("y".into(), "n2".into()));
    }
}
