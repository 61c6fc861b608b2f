//! Import and export commands

use std::path::Path;

use taskboard_engine::{
    export_snapshot, import_and_merge, import_snapshot, read_snapshot, FsFileReader, IdRemap,
    TaskId,
};

use crate::error::{CliError, Result};
use crate::session::Session;

/// What an import changed, for the summary printed afterwards
struct ImportSummary {
    tasks: usize,
    remaps: Vec<IdRemap>,
    skipped: Vec<TaskId>,
}

/// Import a snapshot, replacing the board or merging into it.
///
/// A rejected snapshot leaves the stored board untouched.
pub async fn run_import(session: &Session, file: &Path, merge: bool) -> Result<()> {
    let text = read_snapshot(&FsFileReader, file)
        .await
        .map_err(|e| match e {
            taskboard_engine::BoardError::Io(source) => CliError::file("reading", file, source),
            other => other.into(),
        })?;

    let summary = session.update(|board, ctx| {
        if merge {
            let merged = import_and_merge(&board, &text, ctx)?;
            let summary = ImportSummary {
                tasks: merged.state.tasks.len() - board.tasks.len(),
                remaps: merged.remaps,
                skipped: merged.skipped,
            };
            Ok((merged.state, summary))
        } else {
            let imported = import_snapshot(&text, ctx)?;
            let summary = ImportSummary {
                tasks: imported.state.tasks.len(),
                remaps: imported.remaps,
                skipped: Vec::new(),
            };
            Ok((imported.state, summary))
        }
    })?;

    println!(
        "Imported {} task(s) from {}",
        summary.tasks,
        file.display()
    );
    for remap in &summary.remaps {
        println!("  reassigned id {} -> {}", remap.from, remap.to);
    }
    if !summary.skipped.is_empty() {
        println!(
            "  skipped {} task(s) already on the board",
            summary.skipped.len()
        );
    }
    Ok(())
}

/// Write the board to `file`. The export is recorded in the audit log.
pub fn run_export(session: &Session, file: &Path) -> Result<()> {
    let tasks = session.update(|board, ctx| {
        let exported = export_snapshot(&board, ctx)?;
        std::fs::write(file, &exported.json).map_err(|e| CliError::file("writing", file, e))?;
        let tasks = exported.state.tasks.len();
        Ok((exported.state, tasks))
    })?;
    println!("Exported {} task(s) to {}", tasks, file.display());
    Ok(())
}
