use serde::{Deserialize, Serialize};

use abstutil::prettyprint_usize;

/// Running counters from every stage of consolidation. Edge counts count each direction, so a
/// symmetric edge between two nodes counts twice.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Every node observation from every tile, including duplicates
    pub raw_nodes: usize,
    /// Adjacency entries as listed by the tiles, including ones discarded with duplicate nodes
    pub edges_before_merge: usize,
    /// Number of distinct nodes after rebuilding
    pub merged_nodes: usize,
    pub edges_after_merge: usize,
    /// How many duplicate observations disagreed about the weight
    pub weights_updated: usize,

    /// Neighbors that no tile contained, dropped during rebuild
    pub unresolved_adjacents: usize,
    /// Nodes whose adjacency lost something during rebuild
    pub adjacency_sets_changed: usize,

    pub self_references: usize,
    pub mutual_visibility_edges_added: usize,

    pub nodes_pruned: usize,
    pub nodes_survived: usize,
    pub edges_after_prune: usize,

    pub nodes_cut: usize,
    pub cut_passes: usize,
    pub edges_after_cut: usize,

    pub final_nodes: usize,
}

impl GraphStats {
    pub fn describe(&self) -> Vec<String> {
        let p = prettyprint_usize;
        vec![
            format!("Raw number of nodes: {}", p(self.raw_nodes)),
            format!("Merged number of nodes: {}", p(self.merged_nodes)),
            format!("Edges before merge: {}", p(self.edges_before_merge)),
            format!("Edges after merge: {}", p(self.edges_after_merge)),
            format!(
                "Unresolved neighbors dropped: {} (from {} nodes)",
                p(self.unresolved_adjacents),
                p(self.adjacency_sets_changed)
            ),
            format!("Self references removed: {}", p(self.self_references)),
            format!(
                "Edges added for mutual visibility: {}",
                p(self.mutual_visibility_edges_added)
            ),
            format!(
                "Nodes removed by pruning: {} ({} survived)",
                p(self.nodes_pruned),
                p(self.nodes_survived)
            ),
            format!("Edges after pruning: {}", p(self.edges_after_prune)),
            format!(
                "Nodes removed by cutting: {} over {} passes",
                p(self.nodes_cut),
                p(self.cut_passes)
            ),
            format!("Edges after cutting: {}", p(self.edges_after_cut)),
            format!("Weights updated: {}", p(self.weights_updated)),
            format!("Final number of nodes: {}", p(self.final_nodes)),
        ]
    }
}
