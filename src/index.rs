//! Lookup tables for one computation pass.
//!
//! Records are indexed once by id and by active parent id so that parent
//! resolution and child expansion are constant-time lookups instead of
//! scans over the whole list.

use crate::mode::Mode;
use crate::person::PersonRecord;
use std::collections::HashMap;

/// Borrowed view over the input records for a single mode.
#[derive(Debug)]
pub struct RecordIndex<'a> {
    mode: Mode,
    records: &'a [PersonRecord],
    by_id: HashMap<&'a str, usize>,
    children: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> RecordIndex<'a> {
    pub fn new(records: &'a [PersonRecord], mode: Mode) -> Self {
        let mut by_id: HashMap<&'a str, usize> = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // First occurrence of a duplicated id wins every lookup.
            by_id.entry(record.id.as_str()).or_insert(position);
        }

        let mut children: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for (position, record) in records.iter().enumerate() {
            if by_id.get(record.id.as_str()) != Some(&position) {
                continue;
            }
            if let Some(parent) = mode.parent_id_of(record) {
                children.entry(parent).or_default().push(record.id.as_str());
            }
        }

        RecordIndex {
            mode,
            records,
            by_id,
            children,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn records(&self) -> &'a [PersonRecord] {
        self.records
    }

    pub fn get(&self, id: &str) -> Option<&'a PersonRecord> {
        self.by_id.get(id).map(|&position| &self.records[position])
    }

    /// Input position of the record that wins lookups for `id`.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Whether `position` holds the record that wins lookups for its id.
    pub fn is_canonical(&self, position: usize) -> bool {
        self.records
            .get(position)
            .is_some_and(|record| self.by_id.get(record.id.as_str()) == Some(&position))
    }

    /// Ids whose active parent reference equals `id`, in input order.
    pub fn children_of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Active parent reference of `record`, only if it names a known record.
    pub fn resolved_parent_of(&self, record: &'a PersonRecord) -> Option<&'a str> {
        self.mode
            .parent_id_of(record)
            .filter(|parent| self.contains(parent))
    }
}
