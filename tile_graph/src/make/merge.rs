use std::collections::BTreeSet;

use anyhow::Result;

use crate::graph::NodeWithoutID;
use crate::{Graph, NodeID, RawNode, Tile};

impl Graph {
    /// Folds every node of a tile into the graph. Can be called for any number of tiles before
    /// `simplify`; merging the same tile twice changes nothing but the raw counters. A tile with
    /// a bad coordinate anywhere is rejected before any of it is merged.
    pub fn merge_tile(&mut self, tile: &Tile) -> Result<()> {
        tile.validate()?;
        debug!("Merging {} nodes from {}", tile.nodes.len(), tile.name);
        for raw in &tile.nodes {
            self.merge_node(raw)?;
        }
        Ok(())
    }

    /// The first observation of a coordinate becomes the canonical node and keeps its neighbor
    /// list. Later observations only raise the weight; their neighbors are discarded.
    pub fn merge_node(&mut self, raw: &RawNode) -> Result<NodeID> {
        raw.validate()?;
        self.stats.raw_nodes += 1;
        self.stats.edges_before_merge += raw.adjacent.len();

        let key = raw.pt.to_hashable();
        if let Some(id) = self.lookup_key(&key) {
            let node = self.get_mut(id);
            if node.weight != raw.weight {
                node.weight = node.weight.max(raw.weight);
                self.stats.weights_updated += 1;
            }
            return Ok(id);
        }

        let unresolved: BTreeSet<_> = raw.adjacent.iter().map(|pt| pt.to_hashable()).collect();
        Ok(self.insert(NodeWithoutID {
            pt: raw.pt,
            weight: raw.weight,
            unresolved,
        }))
    }
}
