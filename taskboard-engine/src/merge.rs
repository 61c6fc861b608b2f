//! Merge a reconciled snapshot into the current board
//!
//! The current board always wins: an incoming task whose id is already
//! present is skipped, never overwritten.

use crate::audit::fix_events;
use crate::context::BoardContext;
use crate::reconcile::{fresh_id, IdRemap, Reconciled};
use crate::types::{BoardState, ColumnId, Columns, TaskId};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Outcome of a merge
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub state: BoardState,
    /// Reconciler remaps followed by merge remaps
    pub remaps: Vec<IdRemap>,
    /// Incoming tasks dropped because `current` already holds their id
    pub skipped: Vec<TaskId>,
}

pub fn merge(current: &BoardState, incoming: Reconciled, ctx: &BoardContext) -> Merged {
    let Reconciled {
        state: incoming,
        remaps: mut all_remaps,
    } = incoming;

    let mut used: HashSet<String> = current.tasks.keys().map(|id| id.to_string()).collect();
    let mut translate: HashMap<TaskId, TaskId> = HashMap::new();
    let mut merge_remaps = Vec::new();
    let mut skipped = Vec::new();
    let mut accepted = IndexMap::new();

    // Identity is the task's own id; columns and events refer to the map key
    for (key, mut task) in incoming.tasks {
        let id = if task.id.is_empty() {
            key.clone()
        } else {
            task.id.clone()
        };
        if current.tasks.contains_key(&id) {
            warn!(id = %id, "skipping incoming task that already exists on the board");
            skipped.push(id);
            continue;
        }

        let final_id = if used.contains(id.as_str()) {
            let fresh = TaskId::from_string(fresh_id(ctx, &used));
            warn!(from = %id, to = %fresh, "reassigning colliding incoming task id");
            merge_remaps.push(IdRemap {
                from: id,
                to: fresh.clone(),
            });
            fresh
        } else {
            id
        };
        if key != final_id {
            translate.insert(key, final_id.clone());
        }

        used.insert(final_id.to_string());
        task.id = final_id.clone();
        accepted.insert(final_id, task);
    }

    let through = |id: &TaskId| translate.get(id).cloned().unwrap_or_else(|| id.clone());

    // Current placement first, then accepted incoming ids
    let mut placed: HashSet<TaskId> = HashSet::new();
    let mut columns = Columns::default();
    for column in ColumnId::ALL {
        let list = columns.get_mut(column);
        let candidates = current
            .columns
            .get(column)
            .iter()
            .filter(|id| current.tasks.contains_key(*id))
            .cloned()
            .chain(
                incoming
                    .columns
                    .get(column)
                    .iter()
                    .map(through)
                    .filter(|id| accepted.contains_key(id)),
            );
        for id in candidates {
            if placed.insert(id.clone()) {
                list.push(id);
            }
        }
    }

    for (column, ids) in columns.iter() {
        for id in ids {
            if let Some(task) = accepted.get_mut(id) {
                task.status = column;
            }
        }
    }

    // Incoming history about accepted tasks only, without ids already logged
    let mut event_ids: HashSet<String> = current.audit.iter().map(|e| e.id.to_string()).collect();
    let incoming_events: Vec<_> = incoming
        .audit
        .into_iter()
        .filter_map(|mut event| {
            event.task_id = through(&event.task_id);
            let keep = accepted.contains_key(&event.task_id)
                && event_ids.insert(event.id.to_string());
            keep.then_some(event)
        })
        .collect();

    all_remaps.extend(merge_remaps);

    let mut audit = fix_events(&all_remaps, ctx);
    audit.extend(incoming_events);
    audit.extend(current.audit.iter().cloned());

    let accepted_count = accepted.len();
    let mut tasks = current.tasks.clone();
    tasks.extend(accepted);

    info!(
        accepted = accepted_count,
        skipped = skipped.len(),
        remapped = all_remaps.len(),
        "merged incoming board"
    );

    Merged {
        state: BoardState {
            version: current.version,
            tasks,
            columns,
            audit,
            god_mode: current.god_mode,
        },
        remaps: all_remaps,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SequentialIds;
    use crate::types::{AuditAction, Priority, Task};
    use chrono::Utc;

    fn task(id: &str, title: &str, status: ColumnId) -> Task {
        Task::new(TaskId::from_string(id), title, Priority::Medium, status, Utc::now())
    }

    fn reconciled(board: BoardState) -> Reconciled {
        Reconciled {
            state: board,
            remaps: Vec::new(),
        }
    }

    fn ctx() -> BoardContext {
        BoardContext::default().with_ids(SequentialIds::new())
    }

    #[test]
    fn test_current_wins_on_collision() {
        let current = BoardState::from_tasks([task("a", "Current A", ColumnId::Doing)]);
        let incoming = BoardState::from_tasks([
            task("a", "Incoming A", ColumnId::Done),
            task("b", "Incoming B", ColumnId::Todo),
        ]);

        let merged = merge(&current, reconciled(incoming), &ctx());

        assert_eq!(merged.skipped, vec![TaskId::from("a")]);
        assert_eq!(merged.state.tasks["a"].title, "Current A");
        assert_eq!(merged.state.columns.doing, vec![TaskId::from("a")]);
        assert!(merged.state.columns.done.is_empty());
        assert_eq!(merged.state.columns.todo, vec![TaskId::from("b")]);
        assert!(merged.state.integrity_problems().is_empty());
    }

    #[test]
    fn test_columns_keep_current_order_first() {
        let current = BoardState::from_tasks([
            task("a", "First", ColumnId::Todo),
            task("b", "Second", ColumnId::Todo),
        ]);
        let incoming = BoardState::from_tasks([task("c", "Third", ColumnId::Todo)]);
        let merged = merge(&current, reconciled(incoming), &ctx());
        assert_eq!(
            merged.state.columns.todo,
            vec![TaskId::from("a"), TaskId::from("b"), TaskId::from("c")]
        );
    }

    #[test]
    fn test_audit_composition() {
        let ctx = ctx();
        let current = crate::audit::record_change(
            &BoardState::from_tasks([task("a", "Current A", ColumnId::Todo)]),
            AuditAction::Create,
            &TaskId::from("a"),
            None,
            None,
            &ctx,
        );
        let mut incoming = BoardState::from_tasks([task("b", "Incoming B", ColumnId::Todo)]);
        for task_id in ["a", "b"] {
            incoming = crate::audit::record_change(
                &incoming,
                AuditAction::Update,
                &TaskId::from(task_id),
                None,
                None,
                &ctx,
            );
        }
        let remap = IdRemap {
            from: "old".into(),
            to: "b".into(),
        };
        let merged = merge(
            &current,
            Reconciled {
                state: incoming,
                remaps: vec![remap.clone()],
            },
            &ctx,
        );

        let audit = &merged.state.audit;
        assert_eq!(audit.len(), 3);
        // fix event, the incoming event about b, then current history
        assert_eq!(audit[0].diff.before.as_ref().unwrap().id, Some(remap.from.clone()));
        assert_eq!(audit[1].task_id.as_str(), "b");
        assert_eq!(audit[2], current.audit[0]);
        assert_eq!(merged.remaps, vec![remap]);
    }

    #[test]
    fn test_duplicate_event_ids_are_dropped() {
        let ctx = ctx();
        let current = crate::audit::record_change(
            &BoardState::empty(),
            AuditAction::Create,
            &TaskId::from("a"),
            None,
            None,
            &ctx,
        );
        let mut incoming = BoardState::from_tasks([task("b", "Incoming B", ColumnId::Todo)]);
        let mut event = current.audit[0].clone();
        event.task_id = TaskId::from("b");
        incoming.audit.push(event);

        let merged = merge(&current, reconciled(incoming), &ctx);
        assert_eq!(merged.state.audit.len(), 1);
    }

    #[test]
    fn test_incoming_tasks_sharing_an_id_get_a_remap() {
        let mut incoming = BoardState::empty();
        for (key, title) in [("k1", "First copy"), ("k2", "Second copy")] {
            incoming
                .tasks
                .insert(TaskId::from(key), task("x", title, ColumnId::Todo));
            incoming.columns.todo.push(TaskId::from(key));
        }
        let current = BoardState::from_tasks([task("a", "Current A", ColumnId::Todo)]);

        let merged = merge(&current, reconciled(incoming), &ctx());

        assert_eq!(merged.remaps.len(), 1);
        let remap = &merged.remaps[0];
        assert_eq!(remap.from.as_str(), "x");
        assert_ne!(remap.to.as_str(), "x");
        assert!(merged.skipped.is_empty());

        let state = &merged.state;
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(state.tasks["x"].title, "First copy");
        assert_eq!(state.tasks[remap.to.as_str()].title, "Second copy");
        assert_eq!(
            state.columns.todo,
            vec![TaskId::from("a"), TaskId::from("x"), remap.to.clone()]
        );
        assert!(state.integrity_problems().is_empty());
        // the reassignment is recorded in the history
        assert_eq!(state.audit.len(), 1);
        assert_eq!(state.audit[0].task_id, remap.to);
    }

    #[test]
    fn test_god_mode_comes_from_current() {
        let current = BoardState::empty();
        let incoming = BoardState::empty().with_god_mode(true);
        let merged = merge(&current, reconciled(incoming), &ctx());
        assert!(!merged.state.god_mode);
    }
}
