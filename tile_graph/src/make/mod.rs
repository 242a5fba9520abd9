//! Everything needed to turn raw tiles into a simplified graph.

pub mod collapse_collinear;
mod merge;
mod mutual_visibility;
mod rebuild;
mod remove_disconnected;

use anyhow::Result;

use abstutil::{prettyprint_usize, Timer};

use crate::{ConsolidateOptions, Graph, Tile};

impl Graph {
    /// Merges every tile in order, then simplifies the result. This is the whole one-shot build.
    pub fn consolidate<I: IntoIterator<Item = Tile>>(
        tiles: I,
        opts: &ConsolidateOptions,
        timer: &mut Timer,
    ) -> Result<Graph> {
        opts.validate()?;

        let mut graph = Graph::new();
        timer.start("merge tiles");
        let result = tiles
            .into_iter()
            .try_for_each(|tile| graph.merge_tile(&tile));
        timer.stop("merge tiles");
        result?;
        timer.note(format!(
            "Merged {} raw nodes into {}",
            prettyprint_usize(graph.stats.raw_nodes),
            prettyprint_usize(graph.len())
        ));

        graph.simplify(opts, timer)?;
        Ok(graph)
    }

    /// Runs every stage after merging: rebuild, repair, prune, and cut until nothing changes.
    pub fn simplify(&mut self, opts: &ConsolidateOptions, timer: &mut Timer) -> Result<()> {
        opts.validate()?;

        timer.start("rebuild adjacency");
        let result = self.rebuild_adjacency(opts.rebuild_policy);
        timer.stop("rebuild adjacency");
        result?;
        if self.stats.unresolved_adjacents > 0 {
            timer.warn(format!(
                "Dropped {} neighbors that no tile contained",
                prettyprint_usize(self.stats.unresolved_adjacents)
            ));
        }

        timer.start("fix mutual visibility");
        let added = self.fix_mutual_visibility();
        timer.stop("fix mutual visibility");
        if self.stats.self_references > 0 {
            timer.note(format!(
                "Removed {} self references",
                prettyprint_usize(self.stats.self_references)
            ));
        }
        timer.note(format!(
            "Added {} edges for mutual visibility",
            prettyprint_usize(added)
        ));
        self.stats.edges_after_merge = self.count_adjacents();

        timer.start("remove disconnected");
        let pruned = self.remove_disconnected(opts.prune_threshold);
        timer.stop("remove disconnected");
        timer.note(format!(
            "Pruned {} nodes in components smaller than {}",
            prettyprint_usize(pruned),
            opts.prune_threshold
        ));
        self.stats.edges_after_prune = self.count_adjacents();

        timer.start("collapse collinear nodes");
        let cut = self.collapse_collinear_to_fixpoint(opts);
        timer.stop("collapse collinear nodes");
        timer.note(format!(
            "Cut {} collinear nodes over {} passes",
            prettyprint_usize(cut),
            self.stats.cut_passes
        ));
        self.stats.edges_after_cut = self.count_adjacents();
        self.stats.final_nodes = self.len();

        Ok(())
    }
}
