//! Audit log listing and report

use taskboard_engine::{AuditEvent, AuditReport};

use crate::error::Result;
use crate::session::Session;
use crate::table::new_table;

pub fn run_audit(session: &Session, report: bool, limit: usize) -> Result<()> {
    let board = session.load()?;

    if report {
        println!("{}", AuditReport::build(&board.audit, session.ctx.now()));
        return Ok(());
    }

    if board.audit.is_empty() {
        println!("No audit events.");
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Time", "Action", "Task", "Changed"]);
    for event in board.audit.iter().take(limit) {
        table.add_row(event_row(event));
    }
    println!("{table}");
    if board.audit.len() > limit {
        println!("showing {} of {} event(s)", limit, board.audit.len());
    }
    Ok(())
}

fn event_row(event: &AuditEvent) -> Vec<String> {
    let changed = event
        .diff
        .changed()
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        event.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        event.action.to_string(),
        if event.task_id.is_empty() {
            "-".to_string()
        } else {
            event.task_id.to_string()
        },
        changed,
    ]
}
