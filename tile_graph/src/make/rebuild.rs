use std::collections::BTreeSet;

use anyhow::{bail, Result};

use crate::{Graph, NodeID, RebuildPolicy};

impl Graph {
    /// Replaces every coordinate-only neighbor with the canonical node at that coordinate.
    /// Neighbors that no tile contained are dropped (and counted) or abort the build, depending
    /// on the policy. Nothing is modified if this fails.
    ///
    /// A node listing itself becomes a self-loop here; `fix_mutual_visibility` removes those.
    pub fn rebuild_adjacency(&mut self, policy: RebuildPolicy) -> Result<()> {
        let mut resolved: Vec<(NodeID, BTreeSet<NodeID>)> = Vec::new();
        let mut dropped = 0;
        let mut nodes_changed = 0;

        for node in self.all_nodes() {
            if node.is_resolved() {
                continue;
            }
            let mut found = BTreeSet::new();
            let mut missing = 0;
            for key in &node.unresolved {
                match self.lookup_key(key) {
                    Some(id) => {
                        found.insert(id);
                    }
                    None => {
                        if policy == RebuildPolicy::Strict {
                            bail!(
                                "{} at {} lists a neighbor at {}, but no tile contains that point",
                                node.id,
                                node.pt,
                                key
                            );
                        }
                        missing += 1;
                    }
                }
            }
            if missing > 0 {
                dropped += missing;
                nodes_changed += 1;
            }
            resolved.push((node.id, found));
        }

        for (id, found) in resolved {
            let node = self.get_mut(id);
            node.adjacent.extend(found);
            node.unresolved.clear();
        }

        if dropped > 0 {
            warn!(
                "Dropped {} neighbors from {} nodes that no tile contained",
                dropped, nodes_changed
            );
        }
        self.stats.unresolved_adjacents += dropped;
        self.stats.adjacency_sets_changed += nodes_changed;
        self.stats.merged_nodes = self.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use geom::LonLat;

    use crate::{RawNode, Tile};

    use super::*;

    fn pt(lon: f64) -> LonLat {
        LonLat::new(lon, -33.0)
    }

    fn two_tiles() -> Vec<Tile> {
        vec![
            Tile::new(
                "west",
                vec![
                    RawNode::new(pt(0.0), 1, vec![pt(0.001)]),
                    // Seen again in the other tile
                    RawNode::new(pt(0.001), 1, vec![pt(0.0), pt(0.002)]),
                ],
            ),
            Tile::new(
                "east",
                vec![
                    RawNode::new(pt(0.001), 4, vec![pt(0.002)]),
                    RawNode::new(pt(0.002), 1, vec![pt(0.001), pt(0.009)]),
                ],
            ),
        ]
    }

    #[test]
    fn neighbors_point_at_canonical_nodes() {
        let mut graph = Graph::new();
        for tile in two_tiles() {
            graph.merge_tile(&tile).unwrap();
        }
        graph.rebuild_adjacency(RebuildPolicy::Lenient).unwrap();

        let a = graph.lookup(pt(0.0)).unwrap();
        let b = graph.lookup(pt(0.001)).unwrap();
        let c = graph.lookup(pt(0.002)).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(b).weight, 4);
        assert_eq!(graph.neighbors(a).iter().cloned().collect::<Vec<_>>(), vec![b]);
        assert_eq!(
            graph.neighbors(b).iter().cloned().collect::<Vec<_>>(),
            vec![a, c]
        );
        // pt(0.009) isn't in any tile
        assert_eq!(graph.neighbors(c).iter().cloned().collect::<Vec<_>>(), vec![b]);
        assert!(graph.all_nodes().all(|n| n.is_resolved()));

        assert_eq!(graph.stats().unresolved_adjacents, 1);
        assert_eq!(graph.stats().adjacency_sets_changed, 1);
        assert_eq!(graph.stats().merged_nodes, 3);
    }

    #[test]
    fn strict_policy_aborts() {
        let mut graph = Graph::new();
        for tile in two_tiles() {
            graph.merge_tile(&tile).unwrap();
        }
        let before = graph.clone();
        let err = graph.rebuild_adjacency(RebuildPolicy::Strict).unwrap_err();
        assert!(err.to_string().contains("no tile contains"));
        assert_eq!(graph, before);
    }

    #[test]
    fn self_reference_becomes_self_loop() {
        let mut graph = Graph::new();
        let id = graph
            .merge_node(&RawNode::new(pt(0.0), 1, vec![pt(0.0)]))
            .unwrap();
        graph.rebuild_adjacency(RebuildPolicy::Strict).unwrap();
        assert!(graph.neighbors(id).contains(&id));
    }
}
