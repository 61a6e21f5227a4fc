//! Path-local cycle guard for depth and descendant walks.
//!
//! Both walks keep the ids on the current path in a `visiting` set. An edge
//! that leads back onto the path is treated as absent. Ids leave the set
//! when the walk backs out of them, so a node reached again through a
//! different path is counted again.
//!
//! The walks use explicit stacks rather than recursion so that very long
//! parent chains cannot exhaust the call stack.

use crate::index::RecordIndex;
use crate::person::PersonRecord;
use log::trace;
use std::collections::HashSet;

/// Receives every edge the guard refused to follow.
pub trait CycleObserver {
    fn cycle_edge(&mut self, from: &str, to: &str);
}

impl CycleObserver for () {
    fn cycle_edge(&mut self, _from: &str, _to: &str) {}
}

/// Observer that records the refused edges in the order they were hit.
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    pub edges: Vec<(String, String)>,
}

impl CycleObserver for CollectingObserver {
    fn cycle_edge(&mut self, from: &str, to: &str) {
        self.edges.push((from.to_string(), to.to_string()));
    }
}

/// Number of parent hops from `id` up to its root. Unknown ids are 0.
pub fn resolve_depth<'a>(
    id: &str,
    index: &RecordIndex<'a>,
    visiting: &mut HashSet<&'a str>,
) -> usize {
    resolve_depth_observed(id, index, visiting, &mut ())
}

pub fn resolve_depth_observed<'a>(
    id: &str,
    index: &RecordIndex<'a>,
    visiting: &mut HashSet<&'a str>,
    observer: &mut dyn CycleObserver,
) -> usize {
    match index.get(id) {
        Some(record) => depth_of_record(record, index, visiting, observer),
        None => 0,
    }
}

/// Depth walk starting from a specific record rather than an id lookup.
///
/// Needed for records whose id is shadowed by an earlier duplicate.
pub fn depth_of_record<'a>(
    record: &'a PersonRecord,
    index: &RecordIndex<'a>,
    visiting: &mut HashSet<&'a str>,
    observer: &mut dyn CycleObserver,
) -> usize {
    let mut added: Vec<&'a str> = Vec::new();
    let mut depth = 0;
    let mut current = record;

    loop {
        if current.is_founder {
            break;
        }
        let Some(parent_id) = index.resolved_parent_of(current) else {
            break;
        };
        if visiting.insert(current.id.as_str()) {
            added.push(current.id.as_str());
        }
        if visiting.contains(parent_id) {
            trace!("cycle guard: not following {} -> {}", current.id, parent_id);
            observer.cycle_edge(&current.id, parent_id);
            break;
        }
        let Some(parent) = index.get(parent_id) else {
            break;
        };
        depth += 1;
        current = parent;
    }

    for id in added {
        visiting.remove(id);
    }
    depth
}

/// Count of nodes reachable from `id` through child links, without
/// revisiting anything on the current path. Unknown ids are 0.
pub fn resolve_descendants<'a>(
    id: &str,
    index: &RecordIndex<'a>,
    visiting: &mut HashSet<&'a str>,
) -> usize {
    resolve_descendants_observed(id, index, visiting, &mut ())
}

pub fn resolve_descendants_observed<'a>(
    id: &str,
    index: &RecordIndex<'a>,
    visiting: &mut HashSet<&'a str>,
    observer: &mut dyn CycleObserver,
) -> usize {
    let Some(start) = index.get(id).map(|record| record.id.as_str()) else {
        return 0;
    };

    let start_added = visiting.insert(start);
    let mut count = 0;
    let mut stack: Vec<(&'a str, usize)> = vec![(start, 0)];

    while let Some(top) = stack.last_mut() {
        let (node, next) = *top;
        let children = index.children_of(node);

        if next < children.len() {
            top.1 += 1;
            let child = children[next];
            if visiting.contains(child) {
                trace!("cycle guard: not descending {} -> {}", node, child);
                observer.cycle_edge(node, child);
                continue;
            }
            count += 1;
            visiting.insert(child);
            stack.push((child, 0));
        } else {
            stack.pop();
            if node != start || start_added {
                visiting.remove(node);
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;

    fn chain() -> Vec<PersonRecord> {
        vec![
            PersonRecord::create("a", "Ana").founder(),
            PersonRecord::create("b", "Bia").evangelized_by("a"),
            PersonRecord::create("c", "Caio").evangelized_by("b"),
            PersonRecord::create("d", "Davi").evangelized_by("b"),
        ]
    }

    #[test]
    fn depth_counts_hops_to_root() {
        let records = chain();
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting = HashSet::new();
        assert_eq!(resolve_depth("a", &index, &mut visiting), 0);
        assert_eq!(resolve_depth("b", &index, &mut visiting), 1);
        assert_eq!(resolve_depth("c", &index, &mut visiting), 2);
        assert_eq!(resolve_depth("nobody", &index, &mut visiting), 0);
        assert!(visiting.is_empty());
    }

    #[test]
    fn descendants_count_whole_subtree() {
        let records = chain();
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting = HashSet::new();
        assert_eq!(resolve_descendants("a", &index, &mut visiting), 3);
        assert_eq!(resolve_descendants("b", &index, &mut visiting), 2);
        assert_eq!(resolve_descendants("c", &index, &mut visiting), 0);
        assert!(visiting.is_empty());
    }

    #[test]
    fn two_node_cycle_terminates_and_reports_edge() {
        let records = vec![
            PersonRecord::create("a", "Ana").evangelized_by("b"),
            PersonRecord::create("b", "Bia").evangelized_by("a"),
        ];
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting = HashSet::new();
        let mut observer = CollectingObserver::default();

        assert_eq!(
            resolve_depth_observed("a", &index, &mut visiting, &mut observer),
            1
        );
        assert_eq!(observer.edges, vec![("b".to_string(), "a".to_string())]);

        let mut observer = CollectingObserver::default();
        assert_eq!(
            resolve_descendants_observed("a", &index, &mut visiting, &mut observer),
            1
        );
        assert_eq!(observer.edges, vec![("b".to_string(), "a".to_string())]);
        assert!(visiting.is_empty());
    }

    #[test]
    fn self_parent_is_treated_as_absent_edge() {
        let records = vec![PersonRecord::create("a", "Ana").evangelized_by("a")];
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting = HashSet::new();
        assert_eq!(resolve_depth("a", &index, &mut visiting), 0);
        assert_eq!(resolve_descendants("a", &index, &mut visiting), 0);
    }

    #[test]
    fn caller_owned_path_is_left_untouched() {
        let records = chain();
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting: HashSet<&str> = HashSet::new();
        visiting.insert("b");

        // "b" is already on the caller's path, so neither walk passes through it.
        assert_eq!(resolve_descendants("a", &index, &mut visiting), 0);
        assert_eq!(resolve_depth("c", &index, &mut visiting), 0);
        assert_eq!(visiting.len(), 1);
        assert!(visiting.contains("b"));
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let mut records = vec![PersonRecord::create("0", "root").founder()];
        for i in 1..50_000 {
            records.push(
                PersonRecord::create(i.to_string(), "n").evangelized_by((i - 1).to_string()),
            );
        }
        let index = RecordIndex::new(&records, Mode::Evangelism);
        let mut visiting = HashSet::new();
        assert_eq!(resolve_depth("49999", &index, &mut visiting), 49_999);
        assert_eq!(resolve_descendants("0", &index, &mut visiting), 49_999);
    }
}
