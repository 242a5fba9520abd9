use std::collections::BTreeSet;

use geom::{normalize_degrees, LonLat};

use crate::{ConsolidateOptions, Graph, NodeID};

/// A degree-2 node chosen for removal, along with the two neighbors that get joined.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PendingCut {
    pub start: NodeID,
    pub middle: NodeID,
    pub end: NodeID,
}

/// Is `middle` close enough to the straight line from `start` to `end` to drop it? Both edges
/// together must be shorter than the max span, and the bearing towards `end` must fall in a
/// window centered on the bearing directly away from `start`.
pub fn should_cut(start: LonLat, middle: LonLat, end: LonLat, opts: &ConsolidateOptions) -> bool {
    let span = middle.gps_dist(start) + middle.gps_dist(end);
    if span >= opts.max_cut_span() {
        return false;
    }

    let away_from_start = middle.bearing_to(start).opposite();
    let towards_end = middle.bearing_to(end);
    bearing_within_window(
        towards_end.normalized_degrees(),
        away_from_start.normalized_degrees(),
        opts.cut_angle_tolerance_degrees,
    )
}

/// True if `candidate` lies strictly inside the window of total width `tolerance`, centered on
/// `center`. All values are degrees; the window may straddle north.
pub fn bearing_within_window(candidate: f64, center: f64, tolerance: f64) -> bool {
    if tolerance <= 0.0 {
        return false;
    }
    let candidate = normalize_degrees(candidate);
    let low = normalize_degrees(center - tolerance / 2.0);
    let up = normalize_degrees(center + tolerance / 2.0);

    if low < up {
        return low < candidate && candidate < up;
    }
    // The window wraps past 360. Unwrap the upper bound, and anything below it.
    let up = up + 360.0;
    let candidate = if candidate < up - 360.0 {
        candidate + 360.0
    } else {
        candidate
    };
    low < candidate && candidate < up
}

impl Graph {
    /// Makes every node eligible for cutting again and forgets any pending cuts.
    pub fn reset_cut_eligibility(&mut self) {
        self.cut_ineligible.clear();
        self.pending_cuts.clear();
    }

    /// One pass: find every degree-2 node that should be cut, then cut them all. A node that's
    /// involved in one cut (as the middle or as a neighbor) isn't considered again until
    /// `reset_cut_eligibility`. Returns the number of nodes removed.
    pub fn cut_collinear_nodes(&mut self, opts: &ConsolidateOptions) -> usize {
        self.find_collinear_cuts(opts);
        self.apply_pending_cuts()
    }

    /// Decides every cut of a pass without changing the graph. The cuts are queued until
    /// `apply_pending_cuts`; finding more before then is a bug. Returns the number queued.
    pub(crate) fn find_collinear_cuts(&mut self, opts: &ConsolidateOptions) -> usize {
        assert!(
            self.pending_cuts.is_empty(),
            "{} cuts from a previous pass were never applied",
            self.pending_cuts.len()
        );

        let mut ineligible = std::mem::take(&mut self.cut_ineligible);
        let mut pending = Vec::new();
        for node in self.all_nodes() {
            if node.degree() != 2 || ineligible.contains(&node.id) {
                continue;
            }
            let mut iter = node.adjacent.iter();
            let (start, end) = match (iter.next(), iter.next()) {
                (Some(start), Some(end)) => (*start, *end),
                _ => continue,
            };
            if ineligible.contains(&start) || ineligible.contains(&end) {
                continue;
            }
            if should_cut(self.get(start).pt, node.pt, self.get(end).pt, opts) {
                ineligible.extend([start, node.id, end]);
                pending.push(PendingCut {
                    start,
                    middle: node.id,
                    end,
                });
            }
        }
        self.cut_ineligible = ineligible;
        self.pending_cuts = pending;
        self.pending_cuts.len()
    }

    /// Cuts everything queued by `find_collinear_cuts`. Returns the number of nodes removed.
    pub(crate) fn apply_pending_cuts(&mut self) -> usize {
        let cuts = std::mem::take(&mut self.pending_cuts);
        let num_cuts = cuts.len();
        for cut in cuts {
            self.apply_cut(cut);
        }
        self.stats.nodes_cut += num_cuts;
        num_cuts
    }

    fn apply_cut(&mut self, cut: PendingCut) {
        let expected: BTreeSet<NodeID> = [cut.start, cut.end].into_iter().collect();
        assert_eq!(
            self.get(cut.middle).adjacent,
            expected,
            "{} changed before it could be cut",
            cut.middle
        );
        assert!(self.get(cut.start).adjacent.contains(&cut.middle));
        assert!(self.get(cut.end).adjacent.contains(&cut.middle));

        self.add_edge(cut.start, cut.end);
        self.remove_node(cut.middle);
    }

    /// Repeats cutting passes until one removes nothing, or until `max_cut_passes` is reached.
    /// Returns the total number of nodes removed.
    pub fn collapse_collinear_to_fixpoint(&mut self, opts: &ConsolidateOptions) -> usize {
        let mut total = 0;
        let mut passes = 0;
        loop {
            if let Some(max) = opts.max_cut_passes {
                if passes == max {
                    warn!(
                        "Stopped cutting after {} passes; more nodes could still be cut",
                        passes
                    );
                    break;
                }
            }
            self.reset_cut_eligibility();
            let cut = self.cut_collinear_nodes(opts);
            passes += 1;
            debug!("Cutting pass {} removed {} nodes", passes, cut);
            if cut == 0 {
                break;
            }
            total += cut;
        }
        self.stats.cut_passes += passes;
        info!("Cut {} collinear nodes in {} passes", total, passes);
        total
    }
}

#[cfg(test)]
mod tests {
    use geom::{Angle, Distance};

    use crate::graph::NodeWithoutID;

    use super::*;

    fn origin() -> LonLat {
        LonLat::new(-122.3, 47.6)
    }

    // Walk from `from` for some meters along a compass bearing
    fn walk(from: LonLat, meters: f64, bearing: f64) -> LonLat {
        from.project_away(Distance::meters(meters), Angle::degrees(bearing))
    }

    fn add(graph: &mut Graph, pt: LonLat) -> NodeID {
        graph.insert(NodeWithoutID {
            pt,
            weight: 1,
            unresolved: BTreeSet::new(),
        })
    }

    // Connects the points in order
    fn path(pts: &[LonLat]) -> (Graph, Vec<NodeID>) {
        let mut graph = Graph::new();
        let ids: Vec<NodeID> = pts.iter().map(|pt| add(&mut graph, *pt)).collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        (graph, ids)
    }

    #[test]
    fn window_wraps_around_north() {
        for (candidate, center, tolerance, expected) in [
            (358.0, 2.0, 20.0, true),
            (340.0, 2.0, 20.0, false),
            (5.0, 2.0, 20.0, true),
            (12.0, 2.0, 20.0, false),
            (352.0, 2.0, 20.0, false),
            (0.0, 355.0, 20.0, true),
            (4.9, 355.0, 20.0, true),
            (6.0, 355.0, 20.0, false),
            (180.0, 180.0, 20.0, true),
            (170.5, 180.0, 20.0, true),
            (169.0, 180.0, 20.0, false),
            (-2.0, 2.0, 20.0, true),
            (90.0, 90.0, 0.0, false),
        ] {
            assert_eq!(
                bearing_within_window(candidate, center, tolerance),
                expected,
                "candidate {} in window {} +/- {}/2",
                candidate,
                center,
                tolerance
            );
        }
    }

    #[test]
    fn geometric_test() {
        let opts = ConsolidateOptions::default();
        let middle = origin();
        for (bearing_to_start, d1, bearing_to_end, d2, expected) in [
            // Straight line, short
            (270.0, 50.0, 90.0, 50.0, true),
            // Straight line crossing north
            (181.0, 50.0, 1.0, 50.0, true),
            (175.0, 50.0, 355.0, 50.0, true),
            // Slight bend, within 10 degrees either side
            (270.0, 50.0, 97.0, 50.0, true),
            (270.0, 50.0, 83.0, 50.0, true),
            // Sharp turn
            (270.0, 50.0, 0.0, 50.0, false),
            (270.0, 50.0, 115.0, 50.0, false),
            // Straight, but too long in total
            (270.0, 100.0, 90.0, 85.0, false),
            (270.0, 100.0, 90.0, 75.0, true),
        ] {
            let start = walk(middle, d1, bearing_to_start);
            let end = walk(middle, d2, bearing_to_end);
            assert_eq!(
                should_cut(start, middle, end, &opts),
                expected,
                "start {} m at {}, end {} m at {}",
                d1,
                bearing_to_start,
                d2,
                bearing_to_end
            );
            // The test doesn't care which neighbor is which
            assert_eq!(should_cut(end, middle, start, &opts), expected);
        }
    }

    #[test]
    fn cut_straight_segment() {
        let a = origin();
        let b = walk(a, 50.0, 90.0);
        let c = walk(b, 50.0, 90.0);
        let (mut graph, ids) = path(&[a, b, c]);

        let opts = ConsolidateOptions::default();
        graph.reset_cut_eligibility();
        assert_eq!(graph.cut_collinear_nodes(&opts), 1);
        assert!(!graph.contains(ids[1]));
        assert_eq!(
            graph.neighbors(ids[0]).iter().cloned().collect::<Vec<_>>(),
            vec![ids[2]]
        );
        graph.check_invariants().unwrap();
    }

    #[test]
    fn one_cut_per_neighborhood_per_pass() {
        // 5 collinear points, 30m apart. Node 1 is cut first. Nodes 2 and 3 both touch something
        // involved in that cut, so they wait for the next pass.
        let mut pts = vec![origin()];
        for _ in 0..4 {
            let last = *pts.last().unwrap();
            pts.push(walk(last, 30.0, 45.0));
        }
        let (mut graph, ids) = path(&pts);
        let opts = ConsolidateOptions::default();

        graph.reset_cut_eligibility();
        assert_eq!(graph.cut_collinear_nodes(&opts), 1);
        assert!(!graph.contains(ids[1]));
        assert!(graph.contains(ids[2]));
        assert!(graph.contains(ids[3]));
        graph.check_invariants().unwrap();

        // Without a reset, every remaining candidate was touched already
        assert_eq!(graph.cut_collinear_nodes(&opts), 0);

        // 0 - 2 - 3 - 4 now. Each pass removes one more.
        assert_eq!(graph.collapse_collinear_to_fixpoint(&opts), 2);
        assert_eq!(graph.all_ids(), vec![ids[0], ids[4]]);
        assert_eq!(graph.stats().nodes_cut, 3);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn pending_cuts_wait_for_apply() {
        let a = origin();
        let b = walk(a, 50.0, 90.0);
        let c = walk(b, 50.0, 90.0);
        let (mut graph, ids) = path(&[a, b, c]);
        let opts = ConsolidateOptions::default();

        assert_eq!(graph.find_collinear_cuts(&opts), 1);
        // Nothing changes until the cut is applied
        assert!(graph.contains(ids[1]));
        assert_eq!(graph.stats().nodes_cut, 0);

        assert_eq!(graph.apply_pending_cuts(), 1);
        assert!(!graph.contains(ids[1]));
        assert_eq!(graph.stats().nodes_cut, 1);
        assert_eq!(graph.apply_pending_cuts(), 0);
        graph.check_invariants().unwrap();
    }

    #[test]
    fn reset_forgets_pending_cuts() {
        let a = origin();
        let b = walk(a, 50.0, 90.0);
        let c = walk(b, 50.0, 90.0);
        let (mut graph, ids) = path(&[a, b, c]);
        let opts = ConsolidateOptions::default();

        assert_eq!(graph.find_collinear_cuts(&opts), 1);
        graph.reset_cut_eligibility();
        assert_eq!(graph.apply_pending_cuts(), 0);
        assert_eq!(graph.all_ids(), ids);

        // Eligible again after the reset
        assert_eq!(graph.cut_collinear_nodes(&opts), 1);
        assert!(!graph.contains(ids[1]));
    }

    #[test]
    #[should_panic(expected = "never applied")]
    fn finding_twice_without_applying() {
        let a = origin();
        let b = walk(a, 50.0, 90.0);
        let c = walk(b, 50.0, 90.0);
        let (mut graph, _) = path(&[a, b, c]);
        let opts = ConsolidateOptions::default();

        graph.find_collinear_cuts(&opts);
        graph.find_collinear_cuts(&opts);
    }

    #[test]
    fn keep_turns_and_long_edges() {
        let a = origin();
        let b = walk(a, 50.0, 0.0);
        // A right angle
        let c = walk(b, 50.0, 90.0);
        // Straight on, but far away
        let d = walk(c, 150.0, 90.0);
        let (mut graph, ids) = path(&[a, b, c, d]);

        let opts = ConsolidateOptions::default();
        assert_eq!(graph.collapse_collinear_to_fixpoint(&opts), 0);
        assert_eq!(graph.all_ids(), ids);
        assert_eq!(graph.stats().cut_passes, 1);
    }

    #[test]
    fn triangle_doesnt_collapse_into_a_loop() {
        // Three nodes in a nearly straight, closed loop. Cutting the middle would connect the
        // two ends, which are already connected.
        let a = origin();
        let b = walk(a, 40.0, 90.0);
        let c = walk(b, 40.0, 90.0);
        let (mut graph, ids) = path(&[a, b, c]);
        graph.add_edge(ids[0], ids[2]);

        let opts = ConsolidateOptions::default();
        assert_eq!(graph.collapse_collinear_to_fixpoint(&opts), 1);
        assert_eq!(graph.len(), 2);
        graph.check_invariants().unwrap();
        for node in graph.all_nodes() {
            assert_eq!(node.degree(), 1);
        }
    }

    #[test]
    fn bounded_passes() {
        let mut pts = vec![origin()];
        for _ in 0..8 {
            let last = *pts.last().unwrap();
            pts.push(walk(last, 10.0, 180.0));
        }
        let (mut graph, _) = path(&pts);
        let opts = ConsolidateOptions {
            max_cut_passes: Some(1),
            ..Default::default()
        };
        let cut = graph.collapse_collinear_to_fixpoint(&opts);
        assert!(cut > 0);
        assert_eq!(graph.stats().cut_passes, 1);
        graph.check_invariants().unwrap();
        // More could still be cut
        assert!(graph.clone().collapse_collinear_to_fixpoint(&ConsolidateOptions::default()) > 0);
    }
}
