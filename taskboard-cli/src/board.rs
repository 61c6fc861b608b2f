//! Board-wide commands: init, god mode and statistics

use taskboard_engine::{sample_board, BoardState, RubricSummary};

use crate::cli::Toggle;
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::table::new_table;

/// Create the board file. An existing board is only replaced with `force`.
pub fn run_init(session: &Session, sample: bool, force: bool) -> Result<()> {
    let store = session.store();
    if store.exists() && !force {
        return Err(CliError::BoardExists {
            path: store.path().to_path_buf(),
        });
    }

    let board = if sample {
        sample_board(&session.ctx)
    } else {
        BoardState::empty()
    };
    session.replace(&board)?;
    println!(
        "Created board at {} with {} task(s)",
        store.path().display(),
        board.tasks.len()
    );
    Ok(())
}

pub fn run_god_mode(session: &Session, state: Toggle) -> Result<()> {
    session.update(|board, _| Ok((board.with_god_mode(state.enabled()), ())))?;
    println!(
        "God mode {}",
        if state.enabled() { "on" } else { "off" }
    );
    Ok(())
}

pub fn run_stats(session: &Session, json: bool) -> Result<()> {
    let board = session.load()?;
    let summary = RubricSummary::from_board(&board);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Tasks".to_string(), summary.total.to_string()]);
    table.add_row(vec!["Evaluated".to_string(), summary.evaluated.to_string()]);
    table.add_row(vec!["Pending".to_string(), summary.pending.to_string()]);
    table.add_row(vec![
        "Average score".to_string(),
        summary
            .average_score
            .map(|s| format!("{:.1}/10", s))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    for (column, ids) in board.columns.iter() {
        table.add_row(vec![format!("In {}", column), ids.len().to_string()]);
    }
    println!("{table}");
    Ok(())
}
