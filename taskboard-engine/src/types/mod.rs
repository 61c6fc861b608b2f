//! Core types for the board engine

mod audit;
mod board;
mod ids;
mod task;

pub use audit::{AuditAction, AuditDiff, AuditEvent, USER_LABEL};
pub use board::{BoardState, Columns, BOARD_VERSION};
pub use ids::{is_uuid_like, AuditEventId, TaskId};
pub use task::{ColumnId, Priority, Task, TaskField, TaskPatch, MIN_TITLE_CHARS, RUBRIC_MAX};
