//! Command-line tools for consolidating tiles of geospatial nodes into one simplified graph.

#[macro_use]
extern crate log;

mod consolidate;

use anyhow::Result;
use structopt::StructOpt;

use tile_graph::{RawConsolidateOptions, Tile};

#[derive(StructOpt)]
#[structopt(name = "tgcli", about = "Consolidates tiles of nodes into one graph")]
enum Command {
    /// Merges tiles, then repairs, prunes, and simplifies the resulting graph. Prints statistics
    /// about every stage.
    Consolidate {
        /// Paths to JSON tile files. Tiles are merged in this order.
        #[structopt(required = true)]
        tiles: Vec<String>,
        /// A TOML file with any of the options below. Flags given here take precedence.
        #[structopt(long)]
        config: Option<String>,
        #[structopt(flatten)]
        opts: RawConsolidateOptions,
        /// Also write the statistics as JSON to this path
        #[structopt(long)]
        stats_output: Option<String>,
        /// Verify the final graph is symmetric, has no self-loops, and only refers to live nodes
        #[structopt(long)]
        check: bool,
    },
    /// Print a summary of one tile file
    DescribeTile {
        #[structopt()]
        path: String,
    },
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    match Command::from_args() {
        Command::Consolidate {
            tiles,
            config,
            opts,
            stats_output,
            check,
        } => consolidate::run(tiles, config, opts, stats_output, check)?,
        Command::DescribeTile { path } => describe_tile(path)?,
    }
    Ok(())
}

fn describe_tile(path: String) -> Result<()> {
    let tile = Tile::load(&path)?;
    println!("Tile {} from {}", tile.name, path);
    println!("  {} nodes", abstutil::prettyprint_usize(tile.nodes.len()));
    println!(
        "  {} adjacency entries",
        abstutil::prettyprint_usize(tile.num_edges())
    );
    let self_references = tile
        .nodes
        .iter()
        .filter(|n| n.adjacent.contains(&n.pt))
        .count();
    if self_references > 0 {
        println!("  {} nodes list themselves", self_references);
    }
    Ok(())
}
