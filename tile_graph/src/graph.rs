use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Result};

use abstutil::Counter;
use geom::LonLat;

use crate::make::collapse_collinear::PendingCut;
use crate::{GraphStats, Node, NodeID, NodeKey, VisitStatus};

/// Owns every canonical node. Nodes live in an arena indexed by `NodeID`; removing one leaves an
/// empty slot behind.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    index: BTreeMap<NodeKey, NodeID>,
    live: usize,

    // Transient per-pass state, kept out of the nodes themselves.
    pub(crate) visit_status: BTreeMap<NodeID, VisitStatus>,
    pub(crate) cut_ineligible: BTreeSet<NodeID>,
    pub(crate) pending_cuts: Vec<PendingCut>,

    pub(crate) stats: GraphStats,
}

impl Default for Graph {
    fn default() -> Graph {
        Graph::new()
    }
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            nodes: Vec::new(),
            index: BTreeMap::new(),
            live: 0,
            visit_status: BTreeMap::new(),
            cut_ineligible: BTreeSet::new(),
            pending_cuts: Vec::new(),
            stats: GraphStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeID) -> bool {
        self.maybe_get(id).is_some()
    }

    /// Panics if the node has been removed.
    pub fn get(&self, id: NodeID) -> &Node {
        match self.maybe_get(id) {
            Some(node) => node,
            None => panic!("{} isn't in the graph", id),
        }
    }

    pub fn maybe_get(&self, id: NodeID) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeID) -> &mut Node {
        match self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut()) {
            Some(node) => node,
            None => panic!("{} isn't in the graph", id),
        }
    }

    /// Finds the canonical node at exactly this coordinate.
    pub fn lookup(&self, pt: LonLat) -> Option<NodeID> {
        if pt.longitude.is_nan() || pt.latitude.is_nan() {
            return None;
        }
        self.lookup_key(&pt.to_hashable())
    }

    pub(crate) fn lookup_key(&self, key: &NodeKey) -> Option<NodeID> {
        self.index.get(key).cloned()
    }

    /// In ascending ID order.
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn all_ids(&self) -> Vec<NodeID> {
        self.all_nodes().map(|n| n.id).collect()
    }

    pub fn neighbors(&self, id: NodeID) -> &BTreeSet<NodeID> {
        &self.get(id).adjacent
    }

    /// Each direction of an edge counts once.
    pub fn count_adjacents(&self) -> usize {
        self.all_nodes().map(|n| n.adjacent.len()).sum()
    }

    pub fn degree_histogram(&self) -> Counter<usize> {
        let mut counter = Counter::new();
        for node in self.all_nodes() {
            counter.inc(node.degree());
        }
        counter
    }

    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    /// Nodes that were pruned are still reported as `Pruned` after they're removed.
    pub fn visit_status(&self, id: NodeID) -> VisitStatus {
        self.visit_status
            .get(&id)
            .cloned()
            .unwrap_or(VisitStatus::Unvisited)
    }

    pub(crate) fn insert(&mut self, node_without_id: NodeWithoutID) -> NodeID {
        let id = NodeID(self.nodes.len());
        let key = node_without_id.pt.to_hashable();
        assert!(!self.index.contains_key(&key), "{} inserted twice", key);
        self.nodes.push(Some(Node {
            id,
            pt: node_without_id.pt,
            weight: node_without_id.weight,
            adjacent: BTreeSet::new(),
            unresolved: node_without_id.unresolved,
        }));
        self.index.insert(key, id);
        self.live += 1;
        id
    }

    /// Adds the edge in both directions.
    pub(crate) fn add_edge(&mut self, a: NodeID, b: NodeID) {
        assert_ne!(a, b, "can't connect {} to itself", a);
        self.get_mut(a).adjacent.insert(b);
        self.get_mut(b).adjacent.insert(a);
    }

    /// Removes a node, also striking it from all of its neighbors. Neighbors must already list
    /// the node; otherwise a previous pass broke symmetry.
    pub fn remove_node(&mut self, id: NodeID) {
        let node = match self.nodes.get_mut(id.0).and_then(|slot| slot.take()) {
            Some(node) => node,
            None => panic!("Can't remove {}; it isn't in the graph", id),
        };
        for adj in &node.adjacent {
            if *adj == id {
                continue;
            }
            let adj_node = self.get_mut(*adj);
            let listed = adj_node.adjacent.remove(&id);
            debug_assert!(listed, "{} doesn't list its neighbor {}", adj, id);
        }
        self.index.remove(&node.key());
        self.live -= 1;
    }

    /// Checks the structural invariants: no self-loops, symmetric edges, every reference points
    /// to a live canonical node, and the coordinate index agrees with the arena.
    pub fn check_invariants(&self) -> Result<()> {
        if self.index.len() != self.live {
            bail!(
                "index has {} entries, but {} nodes are live",
                self.index.len(),
                self.live
            );
        }
        for node in self.all_nodes() {
            if self.index.get(&node.key()) != Some(&node.id) {
                bail!("{} at {} isn't the canonical node there", node.id, node.pt);
            }
            for adj in &node.adjacent {
                if *adj == node.id {
                    bail!("{} is adjacent to itself", node.id);
                }
                match self.maybe_get(*adj) {
                    Some(other) => {
                        if !other.adjacent.contains(&node.id) {
                            bail!("{} sees {}, but not the other way around", node.id, adj);
                        }
                    }
                    None => {
                        bail!("{} refers to removed {}", node.id, adj);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Everything needed to insert a new canonical node.
pub(crate) struct NodeWithoutID {
    pub pt: LonLat,
    pub weight: i16,
    pub unresolved: BTreeSet<NodeKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(lon: f64, lat: f64) -> NodeWithoutID {
        NodeWithoutID {
            pt: LonLat::new(lon, lat),
            weight: 1,
            unresolved: BTreeSet::new(),
        }
    }

    #[test]
    fn removal_strikes_neighbors() {
        let mut graph = Graph::new();
        let a = graph.insert(node(0.0, 0.0));
        let b = graph.insert(node(0.001, 0.0));
        let c = graph.insert(node(0.002, 0.0));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        graph.check_invariants().unwrap();

        graph.remove_node(b);
        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(b));
        assert!(graph.neighbors(a).is_empty());
        assert!(graph.neighbors(c).is_empty());
        assert_eq!(graph.lookup(LonLat::new(0.001, 0.0)), None);
        assert_eq!(graph.lookup(LonLat::new(0.002, 0.0)), Some(c));
        graph.check_invariants().unwrap();

        // IDs aren't reused
        let d = graph.insert(node(0.001, 0.0));
        assert_eq!(d, NodeID(3));
    }

    #[test]
    #[should_panic]
    fn remove_twice() {
        let mut graph = Graph::new();
        let a = graph.insert(node(0.0, 0.0));
        graph.remove_node(a);
        graph.remove_node(a);
    }

    #[test]
    fn detect_asymmetry() {
        let mut graph = Graph::new();
        let a = graph.insert(node(0.0, 0.0));
        let b = graph.insert(node(0.001, 0.0));
        graph.get_mut(a).adjacent.insert(b);
        assert!(graph.check_invariants().is_err());
        graph.get_mut(b).adjacent.insert(a);
        graph.check_invariants().unwrap();
        graph.get_mut(b).adjacent.insert(b);
        assert!(graph.check_invariants().is_err());
    }

    #[test]
    fn histogram() {
        let mut graph = Graph::new();
        let a = graph.insert(node(0.0, 0.0));
        let b = graph.insert(node(0.001, 0.0));
        let c = graph.insert(node(0.002, 0.0));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        let hist = graph.degree_histogram();
        assert_eq!(hist.get(1), 2);
        assert_eq!(hist.get(2), 1);
        assert_eq!(graph.count_adjacents(), 4);
    }
}
