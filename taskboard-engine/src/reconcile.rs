//! Import reconciler: turns a validated snapshot into a consistent board
//!
//! Repairs run in a fixed order: identities, columns, orphans, statuses,
//! then the audit log. Repairs are not errors; every reassigned task id is
//! reported as an [`IdRemap`].

use crate::context::BoardContext;
use crate::error::ValidationError;
use crate::schema::validate_snapshot;
use crate::types::{AuditEventId, BoardState, ColumnId, Columns, Task, TaskId};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// A task identity reassigned during reconciliation or merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRemap {
    pub from: TaskId,
    pub to: TaskId,
}

/// A repaired board plus the identity changes made on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub state: BoardState,
    pub remaps: Vec<IdRemap>,
}

/// Validate `raw` and repair it into a board that holds every invariant
pub fn reconcile(raw: &Value, ctx: &BoardContext) -> Result<Reconciled, ValidationError> {
    let snapshot = validate_snapshot(raw)?;
    Ok(repair(snapshot, ctx))
}

/// Draw ids from the context until one is not in `used`
pub(crate) fn fresh_id(ctx: &BoardContext, used: &HashSet<String>) -> String {
    loop {
        let id = ctx.next_id();
        if !used.contains(&id) {
            return id;
        }
    }
}

fn repair(snapshot: BoardState, ctx: &BoardContext) -> Reconciled {
    // Identity repair
    let mut translate: HashMap<TaskId, TaskId> = HashMap::new();
    let mut remaps = Vec::new();
    let mut used: HashSet<String> = HashSet::new();
    let mut tasks: IndexMap<TaskId, Task> = IndexMap::with_capacity(snapshot.tasks.len());

    for (key, mut task) in snapshot.tasks {
        let effective = if task.id.is_empty() {
            key.clone()
        } else {
            task.id.clone()
        };

        let final_id = if used.contains(effective.as_str()) || key != effective {
            let fresh = TaskId::from_string(fresh_id(ctx, &used));
            warn!(from = %effective, to = %fresh, key = %key, "reassigning conflicting task id");
            translate.insert(effective.clone(), fresh.clone());
            translate.insert(key, fresh.clone());
            remaps.push(IdRemap {
                from: effective,
                to: fresh.clone(),
            });
            fresh
        } else {
            effective
        };

        used.insert(final_id.to_string());
        task.id = final_id.clone();
        tasks.insert(final_id, task);
    }

    let through = |id: &TaskId| translate.get(id).cloned().unwrap_or_else(|| id.clone());

    // Column repair. An id already placed in an earlier column is dropped
    // like an in-column duplicate.
    let mut columns = Columns::default();
    let mut placed: HashSet<TaskId> = HashSet::new();
    for column in ColumnId::ALL {
        let mut kept: IndexSet<TaskId> = IndexSet::new();
        for id in snapshot.columns.get(column) {
            let mapped = through(id);
            if !tasks.contains_key(&mapped) {
                debug!(%column, id = %id, "dropping column reference to unknown task");
                continue;
            }
            if placed.contains(&mapped) && !kept.contains(&mapped) {
                debug!(%column, id = %mapped, "dropping task already placed in another column");
                continue;
            }
            placed.insert(mapped.clone());
            kept.insert(mapped);
        }
        *columns.get_mut(column) = kept.into_iter().collect();
    }

    // Orphan repair
    for id in tasks.keys() {
        if !placed.contains(id) {
            debug!(id = %id, "placing orphaned task in todo");
            columns.todo.push(id.clone());
        }
    }

    // Status repair
    for (column, ids) in columns.iter() {
        for id in ids {
            if let Some(task) = tasks.get_mut(id) {
                task.status = column;
            }
        }
    }

    // Audit repair
    let mut event_ids: HashSet<String> = HashSet::new();
    let audit = snapshot
        .audit
        .into_iter()
        .map(|mut event| {
            event.task_id = through(&event.task_id);
            if event.id.is_empty() || event_ids.contains(event.id.as_str()) {
                event.id = AuditEventId::from_string(fresh_id(ctx, &event_ids));
            }
            event_ids.insert(event.id.to_string());
            event
        })
        .collect();

    Reconciled {
        state: BoardState {
            version: snapshot.version,
            tasks,
            columns,
            audit,
            god_mode: snapshot.god_mode,
        },
        remaps,
    }
}
