use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use geom::{HashableLonLat, LonLat};

/// Identifies a node by its exact coordinate. Two observations of the same physical point from
/// different tiles share a key.
pub type NodeKey = HashableLonLat;

/// An index into the graph's arena. IDs aren't reused after a node is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeID(pub usize);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Node #{}", self.0)
    }
}

/// The canonical record for one physical point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeID,
    pub pt: LonLat,
    /// How strongly this point was observed. The max over all observations.
    pub weight: i16,
    /// Only canonical nodes live here. After `fix_mutual_visibility`, this never contains `id`
    /// and the relation is symmetric.
    pub adjacent: BTreeSet<NodeID>,

    /// Neighbors as listed by the tile, not yet resolved to canonical nodes. Drained by
    /// `rebuild_adjacency`.
    #[serde(skip)]
    pub(crate) unresolved: BTreeSet<NodeKey>,
}

impl Node {
    pub fn key(&self) -> NodeKey {
        self.pt.to_hashable()
    }

    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    /// True once `rebuild_adjacency` has handled every neighbor listed by the tile.
    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Which way the pruning floodfill decided about a node. Assigned once and never reset, so
/// pruning a second time won't reconsider a node that's already been marked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitStatus {
    Unvisited,
    Pruned,
    Survived,
}
