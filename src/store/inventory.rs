//! The inventory store
//!
//! Owns the in-memory table and the persistence backend. Every successful
//! mutation re-persists the entire table, so after a successful call the
//! backing file is an exact snapshot of memory.
//!
//! A mutation whose save fails is NOT rolled back. The call returns
//! `StoreError::NotDurable`, `is_dirty()` stays true, and the caller may
//! retry with `save()` or carry on with memory-only state.

use super::errors::{StoreError, StoreResult};
use super::persistence::{Persistence, StoreConfig};
use super::reader::LoadReport;
use super::table::Table;
use crate::observability::{log_event_with_fields, Event};
use crate::record::Record;

use std::path::Path;

/// Field changes for `Inventory::update`.
///
/// `name: Some("")` means "keep the current name", while the numeric
/// fields use `None` for "keep".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// True if applying this patch changes nothing.
    pub fn is_noop(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
            && self.quantity.is_none()
            && self.price.is_none()
    }

    fn apply(&self, record: &mut Record) {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            record.name = name.to_string();
        }
        if let Some(quantity) = self.quantity {
            record.quantity = quantity;
        }
        if let Some(price) = self.price {
            record.price = price;
        }
    }
}

/// Lazy, restartable search over the table. Clone it to iterate again.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    inner: std::slice::Iter<'a, Record>,
    needle: String,
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = &self.needle;
        self.inner.find(|record| record.matches_lowercase(needle))
    }
}

/// In-memory inventory bound to one persistence backend.
///
/// Single-threaded and unlocked. Two processes (or two `Inventory` values)
/// writing the same backing file is unsupported: each rewrite replaces the
/// whole file, so concurrent writers silently lose each other's changes.
#[derive(Debug)]
pub struct Inventory {
    backend: Box<dyn Persistence>,
    table: Table,
    dirty: bool,
}

impl Inventory {
    /// Build the backend from `config` and perform the initial load.
    pub fn open(config: &StoreConfig) -> StoreResult<(Self, LoadReport)> {
        Self::with_backend(config.backend())
    }

    /// Bind to an explicit backend and perform the initial load.
    ///
    /// A load failure aborts construction.
    pub fn with_backend(backend: Box<dyn Persistence>) -> StoreResult<(Self, LoadReport)> {
        let mut inventory = Self {
            backend,
            table: Table::new(),
            dirty: false,
        };
        let report = inventory.load()?;
        Ok((inventory, report))
    }

    /// Reload from the backend, replacing the in-memory table.
    ///
    /// Refused with `UnsavedChanges` while `is_dirty()`: `save()` first, or
    /// open a new `Inventory` to drop the unsaved state. On failure the
    /// current table is kept.
    pub fn load(&mut self) -> StoreResult<LoadReport> {
        let path = self.path_display();
        if self.dirty {
            return Err(StoreError::UnsavedChanges { path });
        }
        log_event_with_fields(Event::StoreOpen, &[("path", &path)]);

        let outcome = self.backend.load().map_err(|e| {
            log_event_with_fields(
                Event::StoreLoadFailed,
                &[("path", &path), ("error", &e.to_string())],
            );
            e
        })?;

        self.table = outcome.table;
        self.dirty = false;
        Ok(outcome.report)
    }

    /// Persist the full table now. Clears `is_dirty()` on success.
    pub fn save(&mut self) -> StoreResult<()> {
        match self.backend.save(&self.table) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn persist(&mut self, operation: &'static str) -> StoreResult<()> {
        self.save().map_err(|e| e.into_not_durable(operation))
    }

    /// Insert a new record and save.
    pub fn add(&mut self, record: Record) -> StoreResult<()> {
        record.validate()?;
        if self.table.contains(&record.id) {
            return Err(StoreError::DuplicateIdentifier { id: record.id });
        }

        let id = record.id.clone();
        self.table.upsert(record);
        self.persist("add")?;

        log_event_with_fields(Event::RecordAdded, &[("id", &id)]);
        Ok(())
    }

    /// Apply `patch` to the record `id` and save. Returns the updated record.
    pub fn update(&mut self, id: &str, patch: RecordPatch) -> StoreResult<Record> {
        let mut updated = self
            .table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        patch.apply(&mut updated);
        updated.validate()?;
        self.table.upsert(updated.clone());

        self.persist("update")?;

        log_event_with_fields(Event::RecordUpdated, &[("id", id)]);
        Ok(updated)
    }

    /// Delete the record `id` and save. Returns the removed record.
    pub fn remove(&mut self, id: &str) -> StoreResult<Record> {
        let removed = self
            .table
            .remove(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        self.persist("remove")?;

        log_event_with_fields(Event::RecordRemoved, &[("id", id)]);
        Ok(removed)
    }

    /// Case-insensitive substring search over identifier and name.
    ///
    /// Surrounding whitespace in `text` is ignored; empty text matches
    /// every record.
    pub fn search(&self, text: &str) -> Search<'_> {
        Search {
            inner: self.table.iter(),
            needle: text.trim().to_lowercase(),
        }
    }

    /// All records in table order.
    pub fn list(&self) -> &[Record] {
        self.table.as_slice()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.table.get(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Backing file, `None` when persistence is disabled.
    pub fn path(&self) -> Option<&Path> {
        self.backend.path()
    }

    /// True when memory holds changes the last save did not publish.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn path_display(&self) -> String {
        self.path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordError;
    use std::fs;
    use tempfile::TempDir;

    fn lapiz() -> Record {
        Record::new("P001", "Lapiz HB", 100, 0.25)
    }

    fn open_file(temp_dir: &TempDir) -> Inventory {
        let config = StoreConfig::file(temp_dir.path().join("inventory.txt")).with_fsync(false);
        Inventory::open(&config).unwrap().0
    }

    #[test]
    fn test_patch_empty_name_means_no_change() {
        let mut record = lapiz();
        RecordPatch::new().name("").quantity(90).apply(&mut record);
        assert_eq!(record.name, "Lapiz HB");
        assert_eq!(record.quantity, 90);
        assert_eq!(record.price, 0.25);

        RecordPatch::new().name("Lapiz 2B").price(0.3).apply(&mut record);
        assert_eq!(record.name, "Lapiz 2B");
        assert_eq!(record.price, 0.3);
    }

    #[test]
    fn test_patch_is_noop() {
        assert!(RecordPatch::new().is_noop());
        assert!(RecordPatch::new().name("").is_noop());
        assert!(!RecordPatch::new().quantity(0).is_noop());
    }

    #[test]
    fn test_add_rejects_empty_identifier() {
        let temp_dir = TempDir::new().unwrap();
        let mut inventory = open_file(&temp_dir);

        let err = inventory.add(Record::new("", "x", 1, 1.0)).unwrap_err();
        assert_eq!(err.code(), "INVTRACK_MALFORMED_RECORD");
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_search_is_restartable() {
        let (mut inventory, _) = Inventory::open(&StoreConfig::memory()).unwrap();
        inventory.add(lapiz()).unwrap();
        inventory
            .add(Record::new("P002", "Cuaderno", 50, 1.5))
            .unwrap();
        inventory
            .add(Record::new("P003", "LAPIZ rojo", 10, 0.4))
            .unwrap();

        let search = inventory.search("  lapiz ");
        let first: Vec<_> = search.clone().map(|r| r.id.as_str()).collect();
        let second: Vec<_> = search.map(|r| r.id.as_str()).collect();
        assert_eq!(first, vec!["P001", "P003"]);
        assert_eq!(first, second);

        assert_eq!(inventory.search("").count(), 3);
        assert_eq!(inventory.search("p002").count(), 1);
        assert_eq!(inventory.search("regla").count(), 0);
    }

    #[test]
    fn test_memory_mode_never_touches_disk() {
        let temp_dir = TempDir::new().unwrap();
        let cwd_file = temp_dir.path().join("inventory.txt");

        let (mut inventory, report) = Inventory::open(&StoreConfig::memory()).unwrap();
        assert!(report.path.is_none());
        inventory.add(lapiz()).unwrap();
        inventory.update("P001", RecordPatch::new().quantity(1)).unwrap();

        assert!(inventory.path().is_none());
        assert!(!inventory.is_dirty());
        assert!(!cwd_file.exists());
    }

    #[test]
    fn test_failed_save_keeps_memory_change_and_flags_it() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.txt");
        let mut inventory = open_file(&temp_dir);
        inventory.add(lapiz()).unwrap();

        // Replace the backing file with a non-empty directory so the rename fails.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "").unwrap();

        let err = inventory
            .add(Record::new("P002", "Cuaderno", 50, 1.5))
            .unwrap_err();

        assert!(err.is_durability_failure());
        assert!(inventory.is_dirty());
        assert!(inventory.get("P002").is_some());
        assert!(!temp_dir.path().join("inventory.txt.tmp").exists());

        // Reloading now would drop P002.
        let err = inventory.load().unwrap_err();
        assert_eq!(err.code(), "INVTRACK_STORE_UNSAVED_CHANGES");
        assert!(inventory.get("P002").is_some());

        // Retry succeeds once the obstruction is gone.
        fs::remove_dir_all(&path).unwrap();
        inventory.save().unwrap();
        assert!(!inventory.is_dirty());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "P001|Lapiz HB|100|0.25\nP002|Cuaderno|50|1.5\n"
        );
        assert_eq!(inventory.load().unwrap().records, 2);
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let temp_dir = TempDir::new().unwrap();
        let mut inventory = open_file(&temp_dir);
        inventory.add(lapiz()).unwrap();

        fs::write(
            temp_dir.path().join("inventory.txt"),
            "P009|Compas|3|4.5\n",
        )
        .unwrap();
        let report = inventory.load().unwrap();

        assert_eq!(report.records, 1);
        assert!(inventory.get("P001").is_none());
        assert_eq!(inventory.get("P009").unwrap().quantity, 3);
    }

    #[test]
    fn test_add_rejects_padded_identifier() {
        let temp_dir = TempDir::new().unwrap();
        let mut inventory = open_file(&temp_dir);

        let err = inventory
            .add(Record::new(" P1", "Lapiz", 1, 1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Malformed(RecordError::PaddedIdentifier { .. })
        ));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_update_rejects_line_break_in_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("inventory.txt");
        let mut inventory = open_file(&temp_dir);
        inventory.add(lapiz()).unwrap();

        let err = inventory
            .update("P001", RecordPatch::new().name("x\nEVIL|Injected|999|0").quantity(1))
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Malformed(RecordError::LineBreak { field: "name" })
        ));
        assert_eq!(inventory.get("P001"), Some(&lapiz()));
        assert!(!inventory.is_dirty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "P001|Lapiz HB|100|0.25\n");

        let reopened = open_file(&temp_dir);
        assert_eq!(reopened.list(), &[lapiz()][..]);
    }

    #[test]
    fn test_add_rejects_line_break_in_identifier() {
        let (mut inventory, _) = Inventory::open(&StoreConfig::memory()).unwrap();
        let err = inventory
            .add(Record::new("P1\r\nP2", "Lapiz", 1, 1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Malformed(RecordError::LineBreak { field: "id" })
        ));
        assert!(inventory.is_empty());
    }
}
