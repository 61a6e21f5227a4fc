//! Per-level metrics and the summary panel numbers for a built network.

use crate::mode::Mode;
use crate::network::{MemberNode, NetworkView};
use crate::person::Status;
use serde::Serialize;
use std::collections::BTreeMap;

/// Head-counts for one depth level of the connected network.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LevelMetrics {
    pub level: usize,
    pub total: usize,
    pub members: usize,
    pub visitors: usize,
    pub pending: usize,
    pub baptized: usize,
    pub encounter_with_god: usize,
}

impl LevelMetrics {
    fn record(&mut self, node: &MemberNode) {
        self.total += 1;
        match node.person.status {
            Status::Member => self.members += 1,
            Status::Visitor => self.visitors += 1,
            Status::Pending => self.pending += 1,
        }
        if node.person.baptized {
            self.baptized += 1;
        }
        if node.person.encounter_with_god {
            self.encounter_with_god += 1;
        }
    }
}

#[derive(Clone, Serialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub mode: Mode,
    pub total: usize,
    pub connected: usize,
    pub standby: usize,
    pub roots: usize,
    pub founders: usize,
    pub max_level: usize,
    pub levels: Vec<LevelMetrics>,
}

/// Level metrics for connected nodes, ascending by level.
pub fn level_metrics(view: &NetworkView) -> Vec<LevelMetrics> {
    let mut by_level: BTreeMap<usize, LevelMetrics> = BTreeMap::new();
    for node in &view.connected {
        by_level
            .entry(node.level)
            .or_insert_with(|| LevelMetrics {
                level: node.level,
                ..Default::default()
            })
            .record(node);
    }
    by_level.into_values().collect()
}

pub fn summarize(view: &NetworkView) -> NetworkSummary {
    let levels = level_metrics(view);
    NetworkSummary {
        mode: view.mode,
        total: view.len(),
        connected: view.connected.len(),
        standby: view.standby.len(),
        roots: view.roots.len(),
        founders: view.nodes().filter(|node| node.person.is_founder).count(),
        max_level: levels.last().map(|metrics| metrics.level).unwrap_or(0),
        levels,
    }
}

/// Connected people with the largest networks below them.
///
/// Ordered by descendant count (descending), ties broken by name. People
/// without descendants are left out.
pub fn top_multipliers(view: &NetworkView, limit: usize) -> Vec<&MemberNode> {
    let mut ranked: Vec<&MemberNode> = view
        .connected
        .iter()
        .filter(|node| node.total_descendants > 0)
        .collect();
    ranked.sort_by(|a, b| {
        b.total_descendants
            .cmp(&a.total_descendants)
            .then_with(|| a.name().cmp(b.name()))
    });
    ranked.truncate(limit);
    ranked
}
