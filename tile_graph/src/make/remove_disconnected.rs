use std::collections::VecDeque;

use crate::{Graph, NodeID, VisitStatus};

impl Graph {
    /// Floodfills every connected component and removes the ones with strictly fewer than
    /// `threshold` nodes. Returns the number of nodes removed.
    ///
    /// A node is only ever visited once. Calling this again only looks at nodes that were added
    /// since; components already marked `Survived` stay, even if they've shrunk below the
    /// threshold.
    pub fn remove_disconnected(&mut self, threshold: usize) -> usize {
        let mut to_remove: Vec<NodeID> = Vec::new();
        let mut num_components = 0;
        let mut largest = 0;

        for start in self.all_ids() {
            if self.visit_status(start) != VisitStatus::Unvisited {
                continue;
            }

            // Breadth-first. Mark nodes as they're queued, so nothing is queued twice.
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            queue.push_back(start);
            self.visit_status.insert(start, VisitStatus::Survived);
            while let Some(current) = queue.pop_front() {
                component.push(current);
                let adjacent: Vec<NodeID> = self.get(current).adjacent.iter().cloned().collect();
                for next in adjacent {
                    if self.visit_status(next) == VisitStatus::Unvisited {
                        self.visit_status.insert(next, VisitStatus::Survived);
                        queue.push_back(next);
                    }
                }
            }

            num_components += 1;
            largest = largest.max(component.len());
            if component.len() < threshold {
                debug!(
                    "Removing disconnected component with {} nodes, starting from {}",
                    component.len(),
                    start
                );
                for id in &component {
                    self.visit_status.insert(*id, VisitStatus::Pruned);
                }
                to_remove.extend(component);
            } else {
                self.stats.nodes_survived += component.len();
            }
        }

        // Whole components go at once, so removal never has to patch up a neighbor that
        // survives.
        let pruned = to_remove.len();
        for id in to_remove {
            self.remove_node(id);
        }
        self.stats.nodes_pruned += pruned;

        info!(
            "Found {} components (the largest has {} nodes); pruned {} nodes",
            num_components, largest, pruned
        );
        pruned
    }
}
