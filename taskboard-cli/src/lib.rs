//! Taskboard CLI library.
//!
//! Exposes the clap definitions and the command handlers so the binary in
//! `main.rs` stays a thin dispatcher.

pub mod audit;
pub mod board;
pub mod cli;
pub mod error;
pub mod list;
pub mod session;
pub mod table;
pub mod task;
pub mod transfer;

pub use cli::{AddArgs, Cli, Commands, EvaluateArgs, Toggle, UpdateArgs};
pub use error::{CliError, Result};
pub use session::Session;
