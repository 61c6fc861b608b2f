//! Configuration loaded with figment
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. `taskboard.toml` / `taskboard.yaml` in the working directory, or an explicit file
//! 3. Environment variables prefixed `TASKBOARD_` (nested keys split on `__`,
//!    e.g. `TASKBOARD_SEARCH__NO_DUE_MARKER`)

use crate::error::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Config file names looked up in the working directory
const CONFIG_FILE_NAMES: [&str; 3] = ["taskboard.toml", "taskboard.yaml", "taskboard.yml"];

/// Settings for free-text search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Searchable sentinel for tasks without a due date
    pub no_due_marker: String,
    /// Searchable sentinel for tasks with neither rubric comment nor evaluator notes
    pub no_notes_marker: String,
    /// chrono format of the localized date put in the search haystack
    pub date_format: String,
    /// Length of the `due:week` window
    pub week_window_days: i64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            no_due_marker: "no date".to_string(),
            no_notes_marker: "no notes".to_string(),
            date_format: "%-d/%-m/%Y".to_string(),
            week_window_days: 7,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Where the JSON file store keeps the board
    pub storage_path: PathBuf,
    pub search: SearchSettings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(".taskboard/board.json"),
            search: SearchSettings::default(),
        }
    }
}

impl BoardConfig {
    /// Load from defaults, the discovered config file in `dir`, and the environment
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let discovered = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|p| p.is_file());
        Self::load(discovered.as_deref())
    }

    /// Load from defaults, an optional config file, and the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let figment = Self::build_figment(file);
        let config: BoardConfig = figment.extract()?;
        debug!(storage = %config.storage_path.display(), "loaded board configuration");
        Ok(config)
    }

    fn build_figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(BoardConfig::default()));

        if let Some(path) = file {
            trace!("Loading config file: {}", path.display());
            figment = match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
