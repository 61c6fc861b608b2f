//! Taskboard CLI - a kanban board with audit history, queries and JSON transfer.
//!
//! Commands:
//! - `taskboard init [--sample] [--force]`: Create the board file
//! - `taskboard list [QUERY...] [--json]`: List tasks, optionally filtered
//! - `taskboard show <id>`: Show every field of a task
//! - `taskboard add <title>`: Add a task
//! - `taskboard update <id>`: Change fields of a task
//! - `taskboard move <id> <column> [--index N]`: Move a task
//! - `taskboard delete <id>`: Delete a task
//! - `taskboard evaluate <id> --score N`: Record a rubric evaluation
//! - `taskboard god-mode on|off`: Show or hide evaluation details
//! - `taskboard import <file> [--merge]`: Import a board snapshot
//! - `taskboard export <file>`: Export the board
//! - `taskboard audit [--report] [--limit N]`: Show the audit log
//! - `taskboard stats [--json]`: Show evaluation progress
//!
//! Environment variables:
//! - TASKBOARD_STORAGE_PATH: Board file location
//! - TASKBOARD_SEARCH__*: Search settings, e.g. TASKBOARD_SEARCH__WEEK_WINDOW_DAYS
//! - RUST_LOG: Log filter when --debug is not given
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard::{audit, board, list, task, transfer};
use taskboard::{Cli, Commands, Session};

/// Map a command result to an exit code, reporting errors on stderr.
fn handle_result(result: taskboard::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn run(cli: Cli) -> taskboard::Result<()> {
    let session = Session::open(cli.config.as_deref(), cli.store.as_deref())?;

    match cli.command {
        Commands::Init { sample, force } => board::run_init(&session, sample, force),
        Commands::List { query, json } => list::run_list(&session, &query, json),
        Commands::Show { id } => task::run_show(&session, &id),
        Commands::Add(args) => task::run_add(&session, &args),
        Commands::Update(args) => task::run_update(&session, &args),
        Commands::Move { id, column, index } => task::run_move(&session, &id, column, index),
        Commands::Delete { id } => task::run_delete(&session, &id),
        Commands::Evaluate(args) => task::run_evaluate(&session, &args),
        Commands::GodMode { state } => board::run_god_mode(&session, state),
        Commands::Import { file, merge } => transfer::run_import(&session, &file, merge).await,
        Commands::Export { file } => transfer::run_export(&session, &file),
        Commands::Audit { report, limit } => audit::run_audit(&session, report, limit),
        Commands::Stats { json } => board::run_stats(&session, json),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("taskboard=debug,taskboard_engine=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = handle_result(run(cli).await);
    std::process::exit(exit_code);
}
