//! BoardContext - the collaborators every operation draws on
//!
//! The context supplies time, identifiers and search settings. It holds no
//! board state: operations take a `BoardState` snapshot and return a new one.

use crate::config::{BoardConfig, SearchSettings};
use crate::query::QueryEnv;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh identifiers for tasks and audit events
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Wall-clock UTC time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Random UUID v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic UUID-shaped identifiers counting up from 1
#[derive(Debug, Default)]
pub struct SequentialIds {
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        uuid::Uuid::from_u128(n as u128).to_string()
    }
}

/// Context passed to every operation
#[derive(Clone)]
pub struct BoardContext {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    search: SearchSettings,
}

impl Default for BoardContext {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("search", &self.search)
            .finish_non_exhaustive()
    }
}

impl BoardContext {
    /// Context on the system clock with UUID v4 identifiers
    pub fn new(search: SearchSettings) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            search,
        }
    }

    /// Context built from a loaded configuration
    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.search.clone())
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the identifier source
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }

    pub fn search(&self) -> &SearchSettings {
        &self.search
    }

    /// Evaluation environment for queries, pinned to the current instant
    pub fn query_env(&self) -> QueryEnv {
        QueryEnv::new(self.now(), self.search.clone())
    }
}
