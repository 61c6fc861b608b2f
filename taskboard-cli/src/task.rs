//! Task commands: add, show, update, move, delete, evaluate

use chrono::{DateTime, NaiveDate, Utc};
use taskboard_engine::task::{AddTask, DeleteTask, EvaluateTask, MoveTask, UpdateTask};
use taskboard_engine::{parse_tags, BoardError, ColumnId, Execute, Task, TaskId};

use crate::cli::{AddArgs, EvaluateArgs, UpdateArgs};
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::table::{date_cell, new_table, text_cell};

/// Parse a due date given as `YYYY-MM-DD` (midnight UTC) or RFC 3339
pub fn parse_due(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::InvalidDate {
            input: input.to_string(),
        })
}

pub fn run_add(session: &Session, args: &AddArgs) -> Result<()> {
    let mut cmd = AddTask::new(&args.title)
        .with_priority(args.priority)
        .in_column(args.column);
    if let Some(description) = &args.description {
        cmd = cmd.with_description(description);
    }
    if let Some(tags) = &args.tags {
        cmd = cmd.with_tags(parse_tags(tags));
    }
    if let Some(minutes) = args.estimate {
        cmd = cmd.with_estimation(minutes);
    }
    if let Some(due) = &args.due {
        cmd = cmd.with_due_at(parse_due(due)?);
    }

    let id = session.update(|board, ctx| {
        let applied = cmd.execute(&board, ctx)?;
        Ok((applied.board, applied.task_id))
    })?;
    println!("Added task {} to {}", id, args.column);
    Ok(())
}

pub fn run_update(session: &Session, args: &UpdateArgs) -> Result<()> {
    let mut cmd = UpdateTask::new(args.id.as_str());
    if let Some(title) = &args.title {
        cmd = cmd.with_title(title);
    }
    if args.clear_description {
        cmd = cmd.with_description(None);
    } else if let Some(description) = &args.description {
        cmd = cmd.with_description(Some(description.clone()));
    }
    if let Some(priority) = args.priority {
        cmd = cmd.with_priority(priority);
    }
    if let Some(tags) = &args.tags {
        cmd = cmd.with_tags(parse_tags(tags));
    }
    if let Some(minutes) = args.estimate {
        cmd = cmd.with_estimation(minutes);
    }
    if args.clear_due {
        cmd = cmd.with_due_at(None);
    } else if let Some(due) = &args.due {
        cmd = cmd.with_due_at(Some(parse_due(due)?));
    }

    let id = apply(session, &cmd)?;
    println!("Updated task {}", id);
    Ok(())
}

pub fn run_move(
    session: &Session,
    id: &str,
    column: ColumnId,
    index: Option<usize>,
) -> Result<()> {
    let mut cmd = MoveTask::to_column(id, column);
    if let Some(index) = index {
        cmd = cmd.at_index(index);
    }
    let id = apply(session, &cmd)?;
    println!("Moved task {} to {}", id, column);
    Ok(())
}

pub fn run_delete(session: &Session, id: &str) -> Result<()> {
    let id = apply(session, &DeleteTask::new(id))?;
    println!("Deleted task {}", id);
    Ok(())
}

/// Comment and notes left out on the command line keep their current values
pub fn run_evaluate(session: &Session, args: &EvaluateArgs) -> Result<()> {
    let score = session.update(|board, ctx| {
        let current = find_task(&board, &args.id)?;
        let comment = args
            .comment
            .clone()
            .or_else(|| current.rubric_comment.clone())
            .unwrap_or_default();
        let notes = args
            .notes
            .clone()
            .or_else(|| current.evaluator_notes.clone())
            .unwrap_or_default();

        let applied = EvaluateTask::new(args.id.as_str(), args.score)
            .with_comment(comment)
            .with_notes(notes)
            .execute(&board, ctx)?;
        Ok((applied.board, args.score))
    })?;
    println!("Evaluated task {}: {}/10", args.id, score);
    Ok(())
}

pub fn run_show(session: &Session, id: &str) -> Result<()> {
    let board = session.load()?;
    let task = find_task(&board, id)?;

    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    for (field, value) in task_rows(task) {
        table.add_row(vec![field.to_string(), value]);
    }
    println!("{table}");
    Ok(())
}

fn apply(session: &Session, cmd: &impl Execute) -> Result<TaskId> {
    session.update(|board, ctx| {
        let applied = cmd.execute(&board, ctx)?;
        Ok((applied.board, applied.task_id))
    })
}

fn find_task<'a>(board: &'a taskboard_engine::BoardState, id: &str) -> Result<&'a Task> {
    board
        .task(id)
        .ok_or_else(|| BoardError::task_not_found(id).into())
}

fn task_rows(task: &Task) -> Vec<(&'static str, String)> {
    vec![
        ("id", task.id.to_string()),
        ("title", task.title.clone()),
        ("description", text_cell(task.description.as_deref())),
        ("priority", task.priority.to_string()),
        ("status", task.status.to_string()),
        ("tags", text_cell(Some(&task.tags.join(", ")))),
        ("estimation", format!("{} min", task.estimation_minutes)),
        ("created", task.created_at.to_rfc3339()),
        ("due", date_cell(task.due_at.as_ref())),
        (
            "rubric score",
            task.rubric_score
                .map(|s| format!("{}/10", s))
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("rubric comment", text_cell(task.rubric_comment.as_deref())),
        ("evaluator notes", text_cell(task.evaluator_notes.as_deref())),
    ]
}
