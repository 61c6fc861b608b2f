//! Plain-text summary of an audit log

use crate::types::{AuditEvent, TaskId, TaskPatch};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// Number of most active tasks listed
pub const TOP_TASKS: usize = 5;

/// Number of newest events listed
pub const RECENT_EVENTS: usize = 10;

/// Summary of an audit log, rendered through `Display`
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    /// Event counts keyed by action name
    pub by_action: BTreeMap<&'static str, usize>,
    /// Tasks with the most events, busiest first; ties keep log order
    pub top_tasks: Vec<(TaskId, usize)>,
    /// Newest events first
    pub recent: Vec<AuditEvent>,
}

impl AuditReport {
    /// Summarize a newest-first audit log
    pub fn build(events: &[AuditEvent], generated_at: DateTime<Utc>) -> Self {
        let mut by_action = BTreeMap::new();
        let mut by_task: IndexMap<&TaskId, usize> = IndexMap::new();

        for event in events {
            *by_action.entry(event.action.as_str()).or_insert(0) += 1;
            // board-level events have no task to rank
            if !event.task_id.is_empty() {
                *by_task.entry(&event.task_id).or_insert(0) += 1;
            }
        }

        let mut top_tasks: Vec<(TaskId, usize)> = by_task
            .into_iter()
            .map(|(id, count)| (id.clone(), count))
            .collect();
        top_tasks.sort_by(|a, b| b.1.cmp(&a.1));
        top_tasks.truncate(TOP_TASKS);

        Self {
            generated_at,
            total: events.len(),
            by_action,
            top_tasks,
            recent: events.iter().take(RECENT_EVENTS).cloned().collect(),
        }
    }
}

fn compact(patch: Option<&TaskPatch>) -> String {
    patch
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_default()
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AUDIT REPORT")?;
        writeln!(f, "Generated: {}", self.generated_at.to_rfc3339())?;
        writeln!(f, "Total events: {}", self.total)?;
        writeln!(f)?;

        writeln!(f, "Events by action:")?;
        for (action, count) in &self.by_action {
            writeln!(f, "- {}: {}", action, count)?;
        }
        writeln!(f)?;

        writeln!(f, "Most active tasks:")?;
        for (id, count) in &self.top_tasks {
            writeln!(f, "- {}: {}", id, count)?;
        }
        writeln!(f)?;

        write!(f, "Latest events (up to {}):", RECENT_EVENTS)?;
        for event in &self.recent {
            let keys = match &event.diff.changed_keys {
                Some(keys) => keys
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "(no diff)".to_string(),
            };
            write!(
                f,
                "\n- [{}] {} task={} keys={} before={} after={}",
                event.timestamp.to_rfc3339(),
                event.action,
                event.task_id,
                keys,
                compact(event.diff.before.as_ref()),
                compact(event.diff.after.as_ref()),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::create_event;
    use crate::context::{BoardContext, SequentialIds};
    use crate::types::{AuditAction, AuditDiff};

    fn events() -> Vec<AuditEvent> {
        let ctx = BoardContext::default().with_ids(SequentialIds::new());
        let mk = |action, task: &str| create_event(action, TaskId::from(task), AuditDiff::empty(), &ctx);
        let mut events = vec![
            mk(AuditAction::Update, "b"),
            mk(AuditAction::Move, "a"),
            mk(AuditAction::Import, ""),
            mk(AuditAction::Update, "a"),
            mk(AuditAction::Create, "b"),
            mk(AuditAction::Create, "a"),
        ];
        events[0].diff = AuditDiff::id_change("old".into(), "b".into());
        events
    }

    #[test]
    fn test_counts_and_ranking() {
        let report = AuditReport::build(&events(), Utc::now());
        assert_eq!(report.total, 6);
        assert_eq!(
            report.by_action.keys().copied().collect::<Vec<_>>(),
            vec!["CREATE", "IMPORT", "MOVE", "UPDATE"]
        );
        assert_eq!(report.by_action["UPDATE"], 2);
        assert_eq!(
            report.top_tasks,
            vec![(TaskId::from("a"), 3), (TaskId::from("b"), 2)]
        );
    }

    #[test]
    fn test_rendered_text() {
        let text = AuditReport::build(&events(), Utc::now()).to_string();
        assert!(text.starts_with("AUDIT REPORT\n"));
        assert!(text.contains("- CREATE: 2"));
        assert!(text.contains("UPDATE task=b keys=id before={\"id\":\"old\"} after={\"id\":\"b\"}"));
        assert!(text.contains("IMPORT task= keys=(no diff)"));
    }

    #[test]
    fn test_recent_is_capped() {
        let many: Vec<AuditEvent> = (0..25).flat_map(|_| events()).collect();
        let report = AuditReport::build(&many, Utc::now());
        assert_eq!(report.recent.len(), RECENT_EVENTS);
        assert_eq!(report.total, 150);
    }
}
