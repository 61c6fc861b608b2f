//! CLI definition for the taskboard command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use taskboard_engine::{ColumnId, Priority};

/// Taskboard - a kanban board with audit history, queries and JSON transfer.
///
/// The board lives in a single JSON file (`.taskboard/board.json` unless
/// configured otherwise). Every change to a task is recorded in the audit log.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Kanban board with audit history, queries and JSON transfer")]
#[command(
    long_about = "Taskboard keeps a three-column kanban board (todo, doing, done) in a JSON \
    file and records every task change in an audit log.\n\n\
    Query syntax for `list`:\n  \
    free words        match title, description, tags, dates and notes\n  \
    tag:<name>        tasks carrying the tag\n  \
    p:<low|medium|high>\n  \
    due:<overdue|week|any>\n  \
    est:<op><minutes> with op one of < <= > >= =\n\n\
    Configuration is read from taskboard.toml or taskboard.yaml in the working \
    directory and from TASKBOARD_* environment variables."
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (defaults to taskboard.toml/yaml in the working directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board file, overriding the configured storage path
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty board, or one filled with sample tasks
    Init {
        /// Fill the board with sample tasks
        #[arg(long)]
        sample: bool,
        /// Replace an existing board
        #[arg(long)]
        force: bool,
    },

    /// List tasks by column, optionally filtered by a query
    List {
        /// Query, e.g. `report tag:compliance p:high due:week est:<60`
        query: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every field of a task
    Show {
        /// Task id
        id: String,
    },

    /// Add a task
    Add(AddArgs),

    /// Change fields of a task
    Update(UpdateArgs),

    /// Move a task to a column
    Move {
        /// Task id
        id: String,
        /// Target column (todo, doing, done)
        column: ColumnId,
        /// Position in the target column, 0 = top (defaults to the bottom)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },

    /// Record a rubric evaluation for a task
    Evaluate(EvaluateArgs),

    /// Show or hide evaluation details in listings
    GodMode {
        state: Toggle,
    },

    /// Import a board snapshot
    ///
    /// Without --merge the snapshot replaces the board. With --merge its
    /// tasks are added to the board; tasks already on the board win.
    Import {
        /// JSON snapshot to read
        file: PathBuf,
        #[arg(long)]
        merge: bool,
    },

    /// Export the board as a JSON snapshot
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Show the audit log, newest first
    Audit {
        /// Print the summary report instead of the event table
        #[arg(long)]
        report: bool,
        /// Maximum number of events to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Show evaluation progress
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title (at least 3 characters)
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, short, default_value = "medium")]
    pub priority: Priority,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    /// Estimated effort in minutes (defaults to 30)
    #[arg(long, value_name = "MINUTES")]
    pub estimate: Option<u32>,
    /// Due date, `YYYY-MM-DD` or RFC 3339
    #[arg(long, value_name = "DATE")]
    pub due: Option<String>,
    #[arg(long, default_value = "todo")]
    pub column: ColumnId,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task id
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long, short)]
    pub priority: Option<Priority>,
    /// Comma-separated tags, replacing the current ones
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long, value_name = "MINUTES")]
    pub estimate: Option<u32>,
    /// Due date, `YYYY-MM-DD` or RFC 3339
    #[arg(long, value_name = "DATE", conflicts_with = "clear_due")]
    pub due: Option<String>,
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Task id
    pub id: String,
    /// Score from 0 to 10
    #[arg(long)]
    pub score: f64,
    #[arg(long)]
    pub comment: Option<String>,
    /// Evaluator notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}
