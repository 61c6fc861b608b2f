//! Sample board for first runs and demos

use crate::context::BoardContext;
use crate::types::{BoardState, ColumnId, Priority, Task, TaskId};
use chrono::Duration;

struct Sample {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    tags: &'static [&'static str],
    minutes: u32,
    created_days_ago: i64,
    due_in_days: Option<i64>,
    column: ColumnId,
}

const SAMPLES: [Sample; 10] = [
    Sample {
        title: "Quarterly compliance review",
        description: "Check the quarter's trades against the market-abuse checklist",
        priority: Priority::High,
        tags: &["compliance", "quarterly", "urgent"],
        minutes: 180,
        created_days_ago: 0,
        due_in_days: Some(2),
        column: ColumnId::Todo,
    },
    Sample {
        title: "Prepare key client report",
        description: "Monthly portfolio performance with risk-adjusted returns",
        priority: Priority::High,
        tags: &["client-facing", "reports"],
        minutes: 120,
        created_days_ago: 1,
        due_in_days: Some(7),
        column: ColumnId::Todo,
    },
    Sample {
        title: "Update operations database",
        description: "Record Friday's trades in the internal ledger",
        priority: Priority::Low,
        tags: &["database", "routine"],
        minutes: 45,
        created_days_ago: 1,
        due_in_days: None,
        column: ColumnId::Todo,
    },
    Sample {
        title: "Request onboarding documents",
        description: "New corporate client still pending identity checks",
        priority: Priority::Medium,
        tags: &["compliance", "onboarding"],
        minutes: 60,
        created_days_ago: 0,
        due_in_days: Some(7),
        column: ColumnId::Todo,
    },
    Sample {
        title: "Rebalance diversified portfolio",
        description: "Trim technology exposure and add utilities per the new guidelines",
        priority: Priority::Medium,
        tags: &["trading", "portfolio"],
        minutes: 90,
        created_days_ago: 1,
        due_in_days: Some(1),
        column: ColumnId::Doing,
    },
    Sample {
        title: "Review pending risk alerts",
        description: "Positions with value-at-risk above the agreed threshold",
        priority: Priority::Medium,
        tags: &["risk", "monitoring"],
        minutes: 60,
        created_days_ago: 0,
        due_in_days: None,
        column: ColumnId::Doing,
    },
    Sample {
        title: "Validate yesterday's executions",
        description: "Confirm every fill from the previous session is booked",
        priority: Priority::Low,
        tags: &["validation", "routine"],
        minutes: 30,
        created_days_ago: 0,
        due_in_days: None,
        column: ColumnId::Doing,
    },
    Sample {
        title: "Archive last month's contracts",
        description: "Scan and file every contract signed during the month",
        priority: Priority::Low,
        tags: &["archive", "routine"],
        minutes: 90,
        created_days_ago: 3,
        due_in_days: None,
        column: ColumnId::Done,
    },
    Sample {
        title: "Monthly team presentation",
        description: "Traded volume, new clients and net margin for the month",
        priority: Priority::Medium,
        tags: &["reports", "internal"],
        minutes: 60,
        created_days_ago: 3,
        due_in_days: None,
        column: ColumnId::Done,
    },
    Sample {
        title: "Tune alerting thresholds",
        description: "Adjust the automatic risk notification parameters",
        priority: Priority::Low,
        tags: &["systems", "maintenance"],
        minutes: 45,
        created_days_ago: 4,
        due_in_days: None,
        column: ColumnId::Done,
    },
];

/// Ten sample tasks across the three columns, dated relative to now.
/// No history, god mode off.
pub fn sample_board(ctx: &BoardContext) -> BoardState {
    let now = ctx.now();
    BoardState::from_tasks(SAMPLES.iter().map(|s| {
        let mut task = Task::new(
            TaskId::from_string(ctx.next_id()),
            s.title,
            s.priority,
            s.column,
            now - Duration::days(s.created_days_ago),
        )
        .with_description(s.description)
        .with_tags(s.tags.iter().copied())
        .with_estimation(s.minutes);
        task.due_at = s.due_in_days.map(|days| now + Duration::days(days));
        task
    }))
}
