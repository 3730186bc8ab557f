//! Persistence backends for the inventory store
//!
//! The store is parametrized by a `Persistence` capability instead of
//! having separate file-backed and in-memory types:
//!
//! - `FilePersistence`: tolerant load + atomic whole-file rewrite
//! - `MemoryPersistence`: persistence disabled; load is empty, save is a no-op

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::StoreResult;
use super::reader::{self, LoadOutcome, LoadReport};
use super::table::Table;
use super::writer::SnapshotWriter;

/// Default backing file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "inventory.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceMode {
    #[default]
    File,
    Memory,
}

impl PersistenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceMode::File => "file",
            PersistenceMode::Memory => "memory",
        }
    }
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explicit store configuration; there is no global file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub mode: PersistenceMode,
    /// fsync the temp file and parent directory on save
    pub fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_FILE),
            mode: PersistenceMode::File,
            fsync: true,
        }
    }
}

impl StoreConfig {
    /// File-backed store at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Store with persistence disabled.
    pub fn memory() -> Self {
        Self {
            mode: PersistenceMode::Memory,
            ..Self::default()
        }
    }

    pub fn with_fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    /// Build the backend this configuration selects.
    pub fn backend(&self) -> Box<dyn Persistence> {
        match self.mode {
            PersistenceMode::File => Box::new(FilePersistence::new(&self.path, self.fsync)),
            PersistenceMode::Memory => Box::new(MemoryPersistence),
        }
    }
}

pub trait Persistence: fmt::Debug {
    /// Read the durable state.
    fn load(&self) -> StoreResult<LoadOutcome>;

    /// Publish the full table as the new durable state.
    fn save(&self, table: &Table) -> StoreResult<()>;

    /// Backing file, if any.
    fn path(&self) -> Option<&Path>;
}

pub struct FilePersistence {
    writer: SnapshotWriter,
}

impl FilePersistence {
    pub fn new(path: &Path, fsync: bool) -> Self {
        Self {
            writer: SnapshotWriter::new(path, fsync),
        }
    }
}

impl fmt::Debug for FilePersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePersistence")
            .field("path", &self.writer.path())
            .finish()
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> StoreResult<LoadOutcome> {
        reader::load_file(self.writer.path())
    }

    fn save(&self, table: &Table) -> StoreResult<()> {
        self.writer.write(table).map(|_| ())
    }

    fn path(&self) -> Option<&Path> {
        Some(self.writer.path())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPersistence;

impl Persistence for MemoryPersistence {
    fn load(&self) -> StoreResult<LoadOutcome> {
        Ok(LoadOutcome {
            table: Table::new(),
            report: LoadReport::default(),
        })
    }

    fn save(&self, _table: &Table) -> StoreResult<()> {
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        None
    }
}
