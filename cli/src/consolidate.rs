use anyhow::Result;

use abstutil::Timer;
use tile_graph::{ConsolidateOptions, Graph, RawConsolidateOptions, Tile};

pub fn run(
    tile_paths: Vec<String>,
    config: Option<String>,
    overrides: RawConsolidateOptions,
    stats_output: Option<String>,
    check: bool,
) -> Result<()> {
    let opts = ConsolidateOptions::layered(config.as_deref(), overrides)?;
    info!("Consolidating {} tiles with {:?}", tile_paths.len(), opts);

    let mut timer = Timer::new(format!("consolidate {} tiles", tile_paths.len()));
    // Tiles are loaded one at a time, so only one is ever in memory
    let mut graph = Graph::new();
    timer.start("load and merge tiles");
    for path in &tile_paths {
        let result = Tile::load(path).and_then(|tile| graph.merge_tile(&tile));
        if let Err(err) = result {
            timer.stop("load and merge tiles");
            return Err(err);
        }
    }
    timer.stop("load and merge tiles");

    graph.simplify(&opts, &mut timer)?;

    for line in graph.stats().describe() {
        println!("{}", line);
    }
    println!("Degree histogram:");
    for (degree, count) in graph.degree_histogram().consume() {
        println!("  {}: {}", degree, abstutil::prettyprint_usize(count));
    }

    if let Some(path) = stats_output {
        abstutil::write_json(&path, graph.stats())?;
    }
    if check {
        timer.start("check invariants");
        let result = graph.check_invariants();
        timer.stop("check invariants");
        result?;
        println!("The final graph is consistent");
    }
    timer.done();
    Ok(())
}
