//! Ordered keyed table of records
//!
//! Records are kept in insertion order for listing; lookups by identifier
//! go through a hash index. Replacing an existing identifier keeps its
//! position.

use std::collections::HashMap;

use crate::record::Record;

#[derive(Debug, Clone, Default)]
pub struct Table {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Insert or replace. Returns the replaced record, if any.
    pub fn upsert(&mut self, record: Record) -> Option<Record> {
        match self.index.get(&record.id) {
            Some(&pos) => Some(std::mem::replace(&mut self.records[pos], record)),
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let pos = self.index.remove(id)?;
        let removed = self.records.remove(pos);
        for later in &self.records[pos..] {
            if let Some(slot) = self.index.get_mut(&later.id) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, qty: i64) -> Record {
        Record::new(id, format!("item {}", id), qty, 1.0)
    }

    fn ids(table: &Table) -> Vec<&str> {
        table.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = Table::new();
        table.upsert(rec("C", 1));
        table.upsert(rec("A", 1));
        table.upsert(rec("B", 1));
        assert_eq!(ids(&table), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut table = Table::new();
        table.upsert(rec("A", 1));
        table.upsert(rec("B", 1));
        let old = table.upsert(rec("A", 7));

        assert_eq!(old.unwrap().quantity, 1);
        assert_eq!(ids(&table), vec!["A", "B"]);
        assert_eq!(table.get("A").unwrap().quantity, 7);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_remove_reindexes_later_records() {
        let mut table = Table::new();
        for id in ["A", "B", "C", "D"] {
            table.upsert(rec(id, 1));
        }
        assert_eq!(table.remove("B").unwrap().id, "B");
        assert!(table.remove("B").is_none());

        assert_eq!(ids(&table), vec!["A", "C", "D"]);
        assert_eq!(table.get("C").unwrap().id, "C");
        assert_eq!(table.get("D").unwrap().id, "D");

        table.upsert(rec("D", 9));
        assert_eq!(ids(&table), vec!["A", "C", "D"]);
        assert_eq!(table.get("D").unwrap().quantity, 9);
    }
}
