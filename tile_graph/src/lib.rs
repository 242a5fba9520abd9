//! Consolidates nodes observed independently in many tiles into one deduplicated graph, then
//! simplifies it:
//!
//! 1. `merge_tile`: deduplicate nodes by coordinate, keeping the strongest weight
//! 2. `rebuild_adjacency`: point every edge at the single canonical node
//! 3. `fix_mutual_visibility`: make edges symmetric and drop self-loops
//! 4. `remove_disconnected`: floodfill and prune small components
//! 5. `collapse_collinear_to_fixpoint`: remove degree-2 nodes lying along a nearly straight line
//!
//! `Graph::consolidate` runs all of these in order.

#[macro_use]
extern crate log;

mod graph;
mod make;
mod node;
mod options;
mod stats;
mod tile;

pub use crate::graph::Graph;
pub use crate::make::collapse_collinear::{bearing_within_window, should_cut};
pub use crate::node::{Node, NodeID, NodeKey, VisitStatus};
pub use crate::options::{ConsolidateOptions, RawConsolidateOptions, RebuildPolicy};
pub use crate::stats::GraphStats;
pub use crate::tile::{RawNode, Tile};
