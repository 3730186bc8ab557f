//! Inventory store
//!
//! The in-memory table of records plus its durable backend.
//!
//! # Guarantees
//!
//! - Load tolerates corruption: malformed lines are skipped and reported,
//!   never fatal; only I/O failures abort a load
//! - Every successful mutation rewrites the whole file via temp + rename,
//!   so the backing file is always a complete snapshot
//! - A failed save never reverts memory; it is reported as `NotDurable`
//! - Lookups are keyed; listing and search follow insertion order

mod errors;
mod input;
mod inventory;
mod persistence;
mod reader;
mod table;
mod writer;

pub use errors::{StoreError, StoreResult};
pub use input::{parse_price, parse_quantity};
pub use inventory::{Inventory, RecordPatch, Search};
pub use persistence::{
    FilePersistence, MemoryPersistence, Persistence, PersistenceMode, StoreConfig,
    DEFAULT_DATA_FILE,
};
pub use reader::{load_file, LineDiagnostic, LoadOutcome, LoadReport};
pub use table::Table;
pub use writer::{temp_path_for, SnapshotWriter};
