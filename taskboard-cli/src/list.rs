//! Taskboard List - show the board, optionally filtered by a query.

use comfy_table::Table;
use taskboard_engine::{build_filtered_view, parse_query, BoardState, Columns, Task};
use tracing::debug;

use crate::error::Result;
use crate::session::Session;
use crate::table::{date_cell, new_table, truncate_str};

const TITLE_WIDTH: usize = 40;

/// Run the list command.
///
/// Query words are joined with spaces and parsed as one query.
pub fn run_list(session: &Session, query: &[String], json: bool) -> Result<()> {
    let board = session.load()?;
    let query = parse_query(&query.join(" "));
    debug!(?query, "filtering board");
    let view = build_filtered_view(&board, &query, &session.ctx.query_env());

    if json {
        let columns: serde_json::Map<String, serde_json::Value> = view
            .iter()
            .map(|(column, ids)| {
                let tasks: Vec<&Task> = ids.iter().filter_map(|id| board.task(id.as_str())).collect();
                (column.to_string(), serde_json::json!(tasks))
            })
            .collect();
        let output = serde_json::json!({ "query": query, "columns": columns });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if view.is_empty() {
        if query.is_empty() {
            println!("The board is empty.");
        } else {
            println!("No tasks match the query.");
        }
        return Ok(());
    }

    println!("{}", board_table(&board, &view));
    println!("{} task(s)", view.len());
    Ok(())
}

/// One row per task in column order. God mode adds the rubric score.
fn board_table(board: &BoardState, view: &Columns) -> Table {
    let mut table = new_table();
    let mut header = vec!["Column", "ID", "Title", "Priority", "Tags", "Est.", "Due"];
    if board.god_mode {
        header.push("Score");
    }
    table.set_header(header);

    for (column, ids) in view.iter() {
        for task in ids.iter().filter_map(|id| board.task(id.as_str())) {
            let mut row = vec![
                column.to_string(),
                task.id.to_string(),
                truncate_str(&task.title, TITLE_WIDTH),
                task.priority.to_string(),
                task.tags.join(", "),
                format!("{}m", task.estimation_minutes),
                date_cell(task.due_at.as_ref()),
            ];
            if board.god_mode {
                row.push(
                    task.rubric_score
                        .map(|s| format!("{}/10", s))
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            table.add_row(row);
        }
    }
    table
}
