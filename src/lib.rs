/*!
# Genealogy Network

Builds the spiritual-genealogy view of a church community: who brought whom
to the faith (evangelism) or who leads whom (discipleship), as depth levels,
descendant counts and root trees.

## Overview

The data store hands over flat person records. Each record may point at one
parent per mode. The builder turns those records into a [`NetworkView`]:

- **connected** people, reachable from a founder or at the top of their own
  chain, each with a level and a count of everyone below them
- **standby** people, isolated from everyone else: no resolvable parent,
  no children and not a founder
- **roots**, one flat tree per root, ready for a hierarchical renderer

Parent references come from user-entered data and may form cycles. Every
walk carries a path-local guard so a cycle ends the walk instead of hanging
or overflowing the stack. The builder never fails because of bad data.

## Modules

- **person**: person and cell records as the data store exports them
- **mode**: evangelism and discipleship modes, and which parent each follows
- **index**: id lookup and children map shared by every walk
- **guard**: cycle-safe depth and descendant resolution
- **network**: the network builder and its output types
- **integrity**: duplicate, dangling, self-parent and cycle reports
- **metrics**: per-level counts, summary numbers and top multipliers
- **render**: text tree, pyramid and summary renderers with expansion state
- **loader**: JSON and CSV import
- **saving**: compressed snapshot cache (gzip + bincode)
- **downloader**: CSV and JSON export of a built network
- **config**: command-line options for the `genealogy` binary

## Usage

```
use genealogy::{Mode, PersonRecord, build};

let people = vec![
    PersonRecord::create("a", "Ana").founder(),
    PersonRecord::create("b", "Bia").evangelized_by("a"),
    PersonRecord::create("c", "Caio").evangelized_by("ghost"),
];
let view = build(&people, Mode::Evangelism);

assert_eq!(view.connected.len(), 2);
assert_eq!(view.standby[0].id(), "c");
assert_eq!(view.roots[0].nodes[1].node.level, 1);
```
*/

pub mod config;
pub mod downloader;
pub mod error;
pub mod guard;
pub mod index;
pub mod integrity;
pub mod loader;
pub mod metrics;
pub mod mode;
pub mod network;
pub mod person;
pub mod render;
pub mod saving;

pub use error::{NetworkError, Result};
pub use guard::{
    CollectingObserver, CycleObserver, resolve_depth, resolve_depth_observed, resolve_descendants,
    resolve_descendants_observed,
};
pub use index::RecordIndex;
pub use integrity::{IntegrityReport, inspect};
pub use loader::Snapshot;
pub use mode::Mode;
pub use network::{
    MemberNode, NetworkView, RootTree, TreeNode, build, build_from_json, build_observed,
};
pub use person::{CellRecord, PersonRecord, Status};
pub use render::{
    ExpansionState, HierarchyRenderer, PyramidRenderer, SummaryRenderer, TextTreeRenderer,
};
