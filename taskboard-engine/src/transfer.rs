//! JSON import and export of whole boards
//!
//! Reading the file is the only async step. Everything after it is pure:
//! an import either yields a consistent board or fails with every schema
//! violation, leaving the caller's board untouched.

use crate::audit::{append, create_event, fix_events};
use crate::context::BoardContext;
use crate::error::{Result, ValidationError};
use crate::logging::Pretty;
use crate::merge::{merge, Merged};
use crate::reconcile::{reconcile, IdRemap};
use crate::types::{AuditAction, AuditDiff, BoardState, TaskId};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Source of import files
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// Reads from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileReader;

#[async_trait]
impl FileReader for FsFileReader {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

/// A standalone import: the repaired board and the identity repairs made
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub state: BoardState,
    pub remaps: Vec<IdRemap>,
}

/// An export: the JSON document and the board with the export recorded
#[derive(Debug, Clone, PartialEq)]
pub struct Exported {
    pub json: String,
    pub state: BoardState,
}

/// Read the text of an import file
pub async fn read_snapshot(reader: &dyn FileReader, path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading board snapshot");
    reader.read_to_string(path).await
}

fn parse_json(text: &str) -> std::result::Result<Value, ValidationError> {
    serde_json::from_str(text)
        .map_err(|e| ValidationError::at_root(format!("not valid JSON: {}", e)))
}

fn import_event(board: &BoardState, ctx: &BoardContext) -> BoardState {
    append(
        board,
        create_event(AuditAction::Import, TaskId::default(), AuditDiff::empty(), ctx),
    )
}

/// Import `text` as a replacement board.
///
/// The resulting history is the `IMPORT` event, then one `UPDATE` fix event
/// per identity repair, then the imported history.
pub fn import_snapshot(
    text: &str,
    ctx: &BoardContext,
) -> std::result::Result<Imported, ValidationError> {
    let raw = parse_json(text)?;
    let reconciled = reconcile(&raw, ctx)?;
    if !reconciled.remaps.is_empty() {
        debug!("identity repairs: {}", Pretty(&reconciled.remaps));
    }

    let mut audit = fix_events(&reconciled.remaps, ctx);
    audit.extend(reconciled.state.audit);
    let state = import_event(
        &BoardState {
            audit,
            ..reconciled.state
        },
        ctx,
    );

    info!(
        tasks = state.tasks.len(),
        remapped = reconciled.remaps.len(),
        "imported board"
    );
    Ok(Imported {
        state,
        remaps: reconciled.remaps,
    })
}

/// Import `text` and merge it into `current`, which wins every id conflict
pub fn import_and_merge(
    current: &BoardState,
    text: &str,
    ctx: &BoardContext,
) -> std::result::Result<Merged, ValidationError> {
    let raw = parse_json(text)?;
    let reconciled = reconcile(&raw, ctx)?;
    let merged = merge(current, reconciled, ctx);
    Ok(Merged {
        state: import_event(&merged.state, ctx),
        ..merged
    })
}

/// Serialize `board` as pretty JSON. The returned board records the export.
pub fn export_snapshot(board: &BoardState, ctx: &BoardContext) -> Result<Exported> {
    let json = serde_json::to_string_pretty(board)?;
    let state = append(
        board,
        create_event(AuditAction::Export, TaskId::default(), AuditDiff::empty(), ctx),
    );
    info!(tasks = board.tasks.len(), bytes = json.len(), "exported board");
    Ok(Exported { json, state })
}
