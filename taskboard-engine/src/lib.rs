//! Kanban task board engine with audit history, queries and JSON transfer
//!
//! A board is an immutable [`BoardState`] value. Every operation takes a
//! snapshot and returns a new one, so a failed operation leaves the caller's
//! board untouched.
//!
//! ## Overview
//!
//! - **Three columns** - `todo`, `doing` and `done`; a task's status always
//!   matches the column holding it
//! - **Audit log** - every task mutation records a field-level diff, newest first
//! - **Query language** - free text plus `tag:`, `p:`, `due:` and `est:` filters,
//!   accent and case insensitive
//! - **Safe import** - external snapshots are validated, repaired and merged
//!   without id collisions, orphaned references or duplicate audit entries
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard_engine::{
//!     build_filtered_view, parse_query, task::AddTask, BoardContext, BoardState, Execute,
//!     Priority,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BoardContext::default();
//! let board = BoardState::empty();
//!
//! // Add a task
//! let applied = AddTask::new("Quarterly compliance review")
//!     .with_priority(Priority::High)
//!     .with_tags(["compliance"])
//!     .execute(&board, &ctx)?;
//!
//! // Filter the board
//! let query = parse_query("tag:compliance p:high");
//! let view = build_filtered_view(&applied.board, &query, &ctx.query_env());
//! println!("{} matching task(s)", view.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Transfer Format
//!
//! ```text
//! {
//!   "version": 1,
//!   "tasks":   { "<id>": { "id": "<id>", "title": "...", ... } },
//!   "columns": { "todo": ["<id>"], "doing": [], "done": [] },
//!   "audit":   [ { "id": "...", "action": "CREATE", "taskId": "<id>", ... } ],
//!   "godMode": false
//! }
//! ```

mod command;
mod config;
mod context;
mod error;
mod logging;

pub mod audit;
pub mod diff;
pub mod merge;
pub mod query;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod seed;
pub mod stats;
pub mod store;
pub mod task;
pub mod transfer;
pub mod types;

pub use command::{parse_tags, Applied, Execute};
pub use config::{BoardConfig, SearchSettings, ENV_PREFIX};
pub use context::{
    BoardContext, Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator,
};
pub use error::{BoardError, Result, ValidationError, ValidationIssue};
pub use logging::Pretty;

pub use audit::{append, create_event, fix_events, record_change};
pub use diff::compute_diff;
pub use merge::{merge, Merged};
pub use query::{build_filtered_view, matches, parse_query, QueryEnv, SearchQuery};
pub use reconcile::{reconcile, IdRemap, Reconciled};
pub use report::AuditReport;
pub use schema::validate_snapshot;
pub use seed::sample_board;
pub use stats::RubricSummary;
pub use store::{JsonFileStore, MemoryStore, StateStore, StoreLock};
pub use transfer::{
    export_snapshot, import_and_merge, import_snapshot, read_snapshot, Exported, FileReader,
    FsFileReader, Imported,
};

// Re-export commonly used types
pub use types::{
    AuditAction, AuditDiff, AuditEvent, AuditEventId, BoardState, ColumnId, Columns, Priority,
    Task, TaskField, TaskId, TaskPatch, USER_LABEL,
};
