use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use geom::LonLat;

/// One observation of a node, as produced by a tile. The neighbors are only coordinates; they
/// may refer to points seen in other tiles, to the node itself, or to points no tile contains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub pt: LonLat,
    pub weight: i16,
    #[serde(default)]
    pub adjacent: Vec<LonLat>,
}

impl RawNode {
    pub fn new(pt: LonLat, weight: i16, adjacent: Vec<LonLat>) -> RawNode {
        RawNode {
            pt,
            weight,
            adjacent,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pt.is_valid() {
            bail!("bad coordinate {}", self.pt);
        }
        for adj in &self.adjacent {
            if !adj.is_valid() {
                bail!("{} has a neighbor with a bad coordinate {}", self.pt, adj);
            }
        }
        Ok(())
    }
}

/// An ordered batch of raw nodes covering some area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub name: String,
    pub nodes: Vec<RawNode>,
}

impl Tile {
    pub fn new<S: Into<String>>(name: S, nodes: Vec<RawNode>) -> Tile {
        Tile {
            name: name.into(),
            nodes,
        }
    }

    /// Reads a tile from a JSON file and checks every coordinate.
    pub fn load(path: &str) -> Result<Tile> {
        let tile: Tile = abstutil::read_json(path)?;
        tile.validate()
            .with_context(|| format!("validating tile from {}", path))?;
        Ok(tile)
    }

    /// Coordinates are used as identity, so NaN or out-of-range values are rejected up-front.
    pub fn validate(&self) -> Result<()> {
        for (idx, node) in self.nodes.iter().enumerate() {
            node.validate()
                .with_context(|| format!("tile {} node {}", self.name, idx))?;
        }
        Ok(())
    }

    /// Counts every adjacency entry, including duplicates and self references.
    pub fn num_edges(&self) -> usize {
        self.nodes.iter().map(|n| n.adjacent.len()).sum()
    }
}
