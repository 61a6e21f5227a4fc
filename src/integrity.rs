//! Data-integrity inspection.
//!
//! The builder tolerates bad references silently; this module lists them so
//! callers can tell operators which records need fixing. Nothing here fails.

use crate::index::RecordIndex;
use crate::mode::Mode;
use crate::person::PersonRecord;
use log::warn;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Serialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub mode: Mode,
    /// Each repeated id once, in first-seen order.
    pub duplicate_ids: Vec<String>,
    /// `(id, parent_id)` pairs whose parent names no record.
    pub dangling_parents: Vec<(String, String)>,
    /// Ids whose active parent is themselves.
    pub self_parents: Vec<String>,
    /// Parent cycles of two or more people, in parent-walk order.
    pub cycles: Vec<Vec<String>>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.anomaly_count() == 0
    }

    pub fn anomaly_count(&self) -> usize {
        self.duplicate_ids.len()
            + self.dangling_parents.len()
            + self.self_parents.len()
            + self.cycles.len()
    }

    /// Emits one warning per anomaly kind present.
    pub fn log_warnings(&self) {
        if !self.duplicate_ids.is_empty() {
            warn!(
                "{} duplicate ids, first record wins: {}",
                self.duplicate_ids.len(),
                self.duplicate_ids.join(", ")
            );
        }
        if !self.dangling_parents.is_empty() {
            warn!(
                "{} {} parent references point to unknown people",
                self.dangling_parents.len(),
                self.mode
            );
        }
        if !self.self_parents.is_empty() {
            warn!(
                "people listed as their own {} parent: {}",
                self.mode,
                self.self_parents.join(", ")
            );
        }
        for cycle in &self.cycles {
            warn!("{} parent cycle: {}", self.mode, cycle.join(" -> "));
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Walk {
    OnPath,
    Done,
}

/// Lists the anomalies in `records` under `mode`.
pub fn inspect(records: &[PersonRecord], mode: Mode) -> IntegrityReport {
    let index = RecordIndex::new(records, mode);
    let mut report = IntegrityReport {
        mode,
        ..Default::default()
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut reported: HashSet<&str> = HashSet::new();
    for record in records {
        let id = record.id.as_str();
        if !seen.insert(id) && reported.insert(id) {
            report.duplicate_ids.push(id.to_string());
        }

        match mode.parent_id_of(record) {
            Some(parent) if parent == id => report.self_parents.push(id.to_string()),
            Some(parent) if !index.contains(parent) => report
                .dangling_parents
                .push((id.to_string(), parent.to_string())),
            _ => {}
        }
    }

    report.cycles = find_cycles(&index);
    report
}

/// Every person has at most one resolved parent, so each cycle is found by
/// walking parent links until the walk meets itself.
fn find_cycles(index: &RecordIndex<'_>) -> Vec<Vec<String>> {
    let mut state: HashMap<&str, Walk> = HashMap::new();
    let mut cycles = Vec::new();

    for (position, record) in index.records().iter().enumerate() {
        if !index.is_canonical(position) || state.contains_key(record.id.as_str()) {
            continue;
        }

        let mut walk: Vec<&str> = Vec::new();
        let mut current = Some(record.id.as_str());
        while let Some(id) = current {
            match state.get(id) {
                Some(Walk::OnPath) => {
                    let start = walk.iter().position(|w| *w == id).unwrap_or(0);
                    let cycle = &walk[start..];
                    if cycle.len() > 1 {
                        cycles.push(rotate_to_first_in_input(cycle, index));
                    }
                    break;
                }
                Some(Walk::Done) => break,
                None => {}
            }
            state.insert(id, Walk::OnPath);
            walk.push(id);
            current = index
                .get(id)
                .and_then(|record| index.resolved_parent_of(record));
        }

        for id in walk {
            state.insert(id, Walk::Done);
        }
    }

    cycles
}

fn rotate_to_first_in_input(cycle: &[&str], index: &RecordIndex<'_>) -> Vec<String> {
    let first = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| index.position_of(id).unwrap_or(usize::MAX))
        .map(|(offset, _)| offset)
        .unwrap_or(0);

    cycle[first..]
        .iter()
        .chain(cycle[..first].iter())
        .map(|id| id.to_string())
        .collect()
}
