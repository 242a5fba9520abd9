use crate::{Graph, NodeID};

impl Graph {
    /// Removes self-loops, then adds the missing reverse direction of every one-way edge. Returns
    /// the number of edges added.
    pub fn fix_mutual_visibility(&mut self) -> usize {
        let mut self_references = 0;
        for id in self.all_ids() {
            if self.get_mut(id).adjacent.remove(&id) {
                self_references += 1;
            }
        }
        if self_references > 0 {
            warn!("{} nodes listed themselves as a neighbor", self_references);
        }

        let mut missing: Vec<(NodeID, NodeID)> = Vec::new();
        for node in self.all_nodes() {
            for adj in &node.adjacent {
                if !self.get(*adj).adjacent.contains(&node.id) {
                    missing.push((*adj, node.id));
                }
            }
        }
        let added = missing.len();
        for (from, to) in missing {
            self.get_mut(from).adjacent.insert(to);
        }

        self.stats.self_references += self_references;
        self.stats.mutual_visibility_edges_added += added;
        added
    }
}
