//! The board a CLI invocation works on: configuration, context and store

use std::path::Path;

use taskboard_engine::{BoardConfig, BoardContext, BoardState, JsonFileStore, StateStore};
use tracing::debug;

use crate::error::{CliError, Result};

pub struct Session {
    pub config: BoardConfig,
    pub ctx: BoardContext,
    store: JsonFileStore,
}

impl Session {
    /// Load configuration and point the store at the board file.
    ///
    /// An explicit `config_file` must exist; otherwise the working directory
    /// is searched for `taskboard.toml` / `taskboard.yaml`.
    pub fn open(config_file: Option<&Path>, store_override: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::file(
                        "reading config",
                        path,
                        std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                    ));
                }
                BoardConfig::load(Some(path))?
            }
            None => BoardConfig::load_from_dir(".")?,
        };

        let path = store_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.storage_path.clone());
        debug!(store = %path.display(), "opening board");

        Ok(Self {
            ctx: BoardContext::from_config(&config),
            store: JsonFileStore::new(path),
            config,
        })
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    /// Current board, read without taking the lock
    pub fn load(&self) -> Result<BoardState> {
        Ok(self.store.load()?)
    }

    /// Load, change and save the board while holding the store lock.
    /// Nothing is saved when `change` fails.
    pub fn update<T>(
        &self,
        change: impl FnOnce(BoardState, &BoardContext) -> Result<(BoardState, T)>,
    ) -> Result<T> {
        let _lock = self.store.lock()?;
        let board = self.store.load()?;
        let (board, output) = change(board, &self.ctx)?;
        self.store.save(&board)?;
        Ok(output)
    }

    /// Replace the stored board outright, ignoring what is there now
    pub fn replace(&self, board: &BoardState) -> Result<()> {
        let _lock = self.store.lock()?;
        self.store.save(board)?;
        Ok(())
    }
}
