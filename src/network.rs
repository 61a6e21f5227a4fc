//! Member graph builder.
//!
//! Turns a flat list of people into the discipleship/evangelism network for
//! one [`Mode`]: per-node depth, children and descendant counts, the split
//! between connected and standby people, and the forest of root trees used
//! for rendering. Every call starts from scratch; nothing is cached between
//! calls or across modes.

use crate::error::Result;
use crate::guard::{CycleObserver, depth_of_record, resolve_descendants_observed};
use crate::index::RecordIndex;
use crate::loader::Snapshot;
use crate::mode::Mode;
use crate::person::PersonRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// A person together with the metrics computed for the active mode.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberNode {
    #[serde(flatten)]
    pub person: PersonRecord,
    pub level: usize,
    pub child_ids: Vec<String>,
    pub total_descendants: usize,
}

impl MemberNode {
    pub fn id(&self) -> &str {
        &self.person.id
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    pub fn has_children(&self) -> bool {
        !self.child_ids.is_empty()
    }
}

/// One entry of a [`RootTree`]. `parent` and `children` are positions in
/// the owning tree's `nodes`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: MemberNode,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// A root and everything expanded below it, stored flat in depth-first
/// pre-order with the root at position 0.
///
/// Entries refer to each other by position, so a tree as deep as the
/// longest parent chain is still dropped, compared and serialized without
/// recursion.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct RootTree {
    pub nodes: Vec<TreeNode>,
}

impl RootTree {
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    pub fn get(&self, position: usize) -> Option<&TreeNode> {
        self.nodes.get(position)
    }

    /// Children of the entry at `position`, with their own positions.
    pub fn children_of(&self, position: usize) -> impl Iterator<Item = (usize, &TreeNode)> {
        self.nodes
            .get(position)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&child| self.nodes.get(child).map(|entry| (child, entry)))
    }

    /// Number of nodes in this tree, the root included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut depths: Vec<usize> = Vec::with_capacity(self.nodes.len());
        for entry in &self.nodes {
            let depth = entry
                .parent
                .and_then(|parent| depths.get(parent))
                .map_or(0, |depth| depth + 1);
            depths.push(depth);
        }
        depths.into_iter().max().unwrap_or(0)
    }
}

/// Output of one build pass.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct NetworkView {
    pub mode: Mode,
    pub connected: Vec<MemberNode>,
    pub standby: Vec<MemberNode>,
    pub roots: Vec<RootTree>,
}

impl NetworkView {
    pub fn len(&self) -> usize {
        self.connected.len() + self.standby.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Connected nodes first, then standby, each in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &MemberNode> {
        self.connected.iter().chain(self.standby.iter())
    }

    pub fn node(&self, id: &str) -> Option<&MemberNode> {
        self.nodes().find(|node| node.id() == id)
    }

    pub fn is_standby(&self, id: &str) -> bool {
        self.standby.iter().any(|node| node.id() == id)
    }

    pub fn root_ids(&self) -> Vec<&str> {
        self.roots
            .iter()
            .filter_map(|tree| tree.root())
            .map(|entry| entry.node.id())
            .collect()
    }
}

/// Builds the network for `records` under `mode`.
///
/// Never fails: dangling parent references are treated as "no parent" and
/// cyclic references are cut by the cycle guard.
pub fn build(records: &[PersonRecord], mode: Mode) -> NetworkView {
    build_observed(records, mode, &mut ())
}

/// Same as [`build`], reporting every edge the cycle guard refused to follow.
pub fn build_observed(
    records: &[PersonRecord],
    mode: Mode,
    observer: &mut dyn CycleObserver,
) -> NetworkView {
    let index = RecordIndex::new(records, mode);
    let mut visiting: HashSet<&str> = HashSet::new();

    let mut nodes: Vec<MemberNode> = Vec::with_capacity(records.len());
    let mut connected_flags: Vec<bool> = Vec::with_capacity(records.len());
    let mut root_flags: Vec<bool> = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        let level = depth_of_record(record, &index, &mut visiting, observer);

        // Children hang off the record that wins lookups for the shared id;
        // later duplicates own none.
        let (child_ids, total_descendants) = if index.is_canonical(position) {
            let child_ids: Vec<String> = index
                .children_of(&record.id)
                .iter()
                .map(|child| child.to_string())
                .collect();
            let total = resolve_descendants_observed(&record.id, &index, &mut visiting, observer);
            (child_ids, total)
        } else {
            (Vec::new(), 0)
        };

        let has_parent = index.resolved_parent_of(record).is_some();
        let is_connected = has_parent || !child_ids.is_empty() || record.is_founder;
        connected_flags.push(is_connected);
        root_flags.push(is_connected && (record.is_founder || !has_parent));

        nodes.push(MemberNode {
            person: record.clone(),
            level,
            child_ids,
            total_descendants,
        });
    }

    let roots: Vec<RootTree> = root_flags
        .iter()
        .enumerate()
        .filter(|(_, is_root)| **is_root)
        .map(|(position, _)| build_tree(position, &nodes, &index, &mut *observer))
        .collect();

    let mut connected = Vec::new();
    let mut standby = Vec::new();
    for (node, is_connected) in nodes.into_iter().zip(connected_flags) {
        if is_connected {
            connected.push(node);
        } else {
            standby.push(node);
        }
    }

    debug!(
        "built {} network: {} connected, {} standby, {} roots",
        mode,
        connected.len(),
        standby.len(),
        roots.len()
    );

    NetworkView {
        mode,
        connected,
        standby,
        roots,
    }
}

/// Expands the tree below `root` without following edges back onto the path.
fn build_tree(
    root: usize,
    nodes: &[MemberNode],
    index: &RecordIndex<'_>,
    observer: &mut dyn CycleObserver,
) -> RootTree {
    let mut tree = RootTree {
        nodes: vec![TreeNode {
            node: nodes[root].clone(),
            parent: None,
            children: Vec::new(),
        }],
    };
    if !index.is_canonical(root) {
        return tree;
    }
    let mut path: HashSet<&str> = HashSet::new();
    path.insert(nodes[root].id());

    // (position in tree, position in input, next child to visit)
    let mut stack: Vec<(usize, usize, usize)> = vec![(0, root, 0)];

    while let Some(top) = stack.last_mut() {
        let (at, position, next) = *top;
        let id = nodes[position].id();
        let child_ids = index.children_of(id);

        if next < child_ids.len() {
            top.2 += 1;
            let child = child_ids[next];
            if path.contains(child) {
                observer.cycle_edge(id, child);
                continue;
            }
            let Some(child_position) = index.position_of(child) else {
                continue;
            };
            path.insert(child);
            let child_at = tree.nodes.len();
            tree.nodes.push(TreeNode {
                node: nodes[child_position].clone(),
                parent: Some(at),
                children: Vec::new(),
            });
            tree.nodes[at].children.push(child_at);
            stack.push((child_at, child_position, 0));
        } else {
            stack.pop();
            path.remove(id);
        }
    }

    tree
}

/// Builds from a loosely typed JSON payload, as handed over by the data store.
///
/// Accepts either an array of people or an object with a `people` array and
/// an optional `cells` array used to fill in cell and leader names.
pub fn build_from_json(value: &Value, mode: &str) -> Result<NetworkView> {
    let mode: Mode = mode.parse()?;
    let snapshot = Snapshot::from_value(value)?;
    Ok(build(&snapshot.denormalized_people(), mode))
}
