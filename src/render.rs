//! Read-only consumers of a [`NetworkView`].
//!
//! The dashboard draws trees and pyramids graphically; the renderers here
//! produce the same views as plain text for the command-line tool and for
//! logs.

use crate::metrics::{level_metrics, summarize, top_multipliers};
use crate::network::{NetworkView, RootTree};
use std::collections::{BTreeMap, HashSet};

/// Which nodes the viewer has expanded. Owned by the caller, never by the
/// builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: impl Into<String>) {
        self.expanded.insert(id.into());
    }

    pub fn collapse(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Flips the state of `id` and returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        }
    }

    /// Expands every node that has children.
    pub fn expand_all(&mut self, view: &NetworkView) {
        for node in view.connected.iter().filter(|node| node.has_children()) {
            self.expanded.insert(node.id().to_string());
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ExpansionState {
            expanded: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub trait HierarchyRenderer {
    fn render(&self, view: &NetworkView, expanded: &ExpansionState) -> String;
}

/// Indented tree, one line per visible node, followed by the standby list.
#[derive(Clone, Debug)]
pub struct TextTreeRenderer {
    pub indent: usize,
    pub show_standby: bool,
}

impl Default for TextTreeRenderer {
    fn default() -> Self {
        Self {
            indent: 4,
            show_standby: true,
        }
    }
}

impl TextTreeRenderer {
    fn render_tree(&self, tree: &RootTree, expanded: &ExpansionState, out: &mut String) {
        // (position in tree, indentation depth)
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some((position, depth)) = stack.pop() {
            let Some(entry) = tree.get(position) else {
                continue;
            };
            let node = &entry.node;
            let is_open = expanded.is_expanded(node.id());
            let marker = match (entry.children.is_empty(), is_open) {
                (true, _) => '*',
                (false, true) => '-',
                (false, false) => '+',
            };
            out.push_str(&" ".repeat(depth * self.indent));
            out.push_str(&format!(
                "{} {} [level {}, {} descendants]\n",
                marker,
                node.name(),
                node.level,
                node.total_descendants
            ));
            if is_open {
                for &child in entry.children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
    }
}

impl HierarchyRenderer for TextTreeRenderer {
    fn render(&self, view: &NetworkView, expanded: &ExpansionState) -> String {
        let mut out = format!("{} network\n", view.mode);
        if view.roots.is_empty() {
            out.push_str("(no roots)\n");
        }
        for root in &view.roots {
            self.render_tree(root, expanded, &mut out);
        }
        if self.show_standby && !view.standby.is_empty() {
            out.push_str(&format!("Standby ({}):\n", view.standby.len()));
            for node in &view.standby {
                out.push_str(&" ".repeat(self.indent));
                out.push_str(node.name());
                out.push('\n');
            }
        }
        out
    }
}

/// One line per level with its head-count and names.
#[derive(Clone, Debug, Default)]
pub struct PyramidRenderer;

impl HierarchyRenderer for PyramidRenderer {
    fn render(&self, view: &NetworkView, _expanded: &ExpansionState) -> String {
        let mut names: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for node in &view.connected {
            names.entry(node.level).or_default().push(node.name());
        }

        let mut out = format!("{} pyramid\n", view.mode);
        for metrics in level_metrics(view) {
            let level_names = names.get(&metrics.level).map(Vec::as_slice).unwrap_or(&[]);
            out.push_str(&format!(
                "Level {}: {} | {}\n",
                metrics.level,
                metrics.total,
                level_names.join(", ")
            ));
        }
        out.push_str(&format!("Standby: {}\n", view.standby.len()));
        out
    }
}

/// The numbers panel: totals, per-level counts and the top multipliers.
#[derive(Clone, Debug)]
pub struct SummaryRenderer {
    pub top: usize,
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self { top: 10 }
    }
}

impl HierarchyRenderer for SummaryRenderer {
    fn render(&self, view: &NetworkView, _expanded: &ExpansionState) -> String {
        let summary = summarize(view);
        let mut out = format!("{} summary\n", summary.mode);
        out.push_str(&format!(
            "People: {} (connected {}, standby {})\n",
            summary.total, summary.connected, summary.standby
        ));
        out.push_str(&format!(
            "Roots: {}  Founders: {}  Deepest level: {}\n",
            summary.roots, summary.founders, summary.max_level
        ));
        for level in &summary.levels {
            out.push_str(&format!(
                "Level {}: {} total, {} members, {} visitors, {} pending, {} baptized, \
                 {} encounter\n",
                level.level,
                level.total,
                level.members,
                level.visitors,
                level.pending,
                level.baptized,
                level.encounter_with_god
            ));
        }

        let multipliers = top_multipliers(view, self.top);
        if !multipliers.is_empty() {
            out.push_str("Top multipliers:\n");
            for (rank, node) in multipliers.iter().enumerate() {
                out.push_str(&format!(
                    "{:>3}. {} ({})\n",
                    rank + 1,
                    node.name(),
                    node.total_descendants
                ));
            }
        }
        out
    }
}
