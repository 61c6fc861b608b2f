//! Board persistence
//!
//! The engine only ever loads a whole board and saves a whole board.

use crate::error::{BoardError, Result};
use crate::types::BoardState;
use fs2::FileExt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Load/save access to the persisted board
pub trait StateStore: Send + Sync {
    fn load(&self) -> Result<BoardState>;
    fn save(&self, board: &BoardState) -> Result<()>;
}

/// One pretty-printed JSON file per board
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Try to acquire an exclusive lock (non-blocking)
    pub fn lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(BoardError::LockBusy { path: lock_path }),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<BoardState> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored board, starting empty");
                return Ok(BoardState::empty());
            }
            Err(e) => return Err(e.into()),
        };

        let board: BoardState =
            serde_json::from_str(&text).map_err(|e| BoardError::CorruptState {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let problems = board.integrity_problems();
        if !problems.is_empty() {
            return Err(BoardError::CorruptState {
                path: self.path.clone(),
                message: problems.join("; "),
            });
        }

        trace!(path = %self.path.display(), tasks = board.tasks.len(), "loaded board");
        Ok(board)
    }

    fn save(&self, board: &BoardState) -> Result<()> {
        let json = serde_json::to_string_pretty(board)?;
        atomic_write(&self.path, json.as_bytes())?;
        debug!(path = %self.path.display(), tasks = board.tasks.len(), "saved board");
        Ok(())
    }
}

/// RAII lock guard - releases on drop
#[derive(Debug)]
pub struct StoreLock {
    file: fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    board: Mutex<BoardState>,
}

impl MemoryStore {
    pub fn new(board: BoardState) -> Self {
        Self {
            board: Mutex::new(board),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<BoardState> {
        let guard = self.board.lock().map_err(|_| poisoned())?;
        Ok(guard.clone())
    }

    fn save(&self, board: &BoardState) -> Result<()> {
        let mut guard = self.board.lock().map_err(|_| poisoned())?;
        *guard = board.clone();
        Ok(())
    }
}

fn poisoned() -> BoardError {
    BoardError::Io(std::io::Error::other("memory store lock poisoned"))
}
