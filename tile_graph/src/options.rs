use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use geom::Distance;

/// What to do when a node lists a neighbor that no tile contains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildPolicy {
    /// Drop the edge and count it. Tiles are sourced independently, so dangling references at
    /// tile borders are expected.
    Lenient,
    /// Abort the whole build.
    Strict,
}

impl FromStr for RebuildPolicy {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<RebuildPolicy> {
        match x {
            "lenient" => Ok(RebuildPolicy::Lenient),
            "strict" => Ok(RebuildPolicy::Strict),
            _ => bail!("unknown rebuild policy {}; use lenient or strict", x),
        }
    }
}

impl fmt::Display for RebuildPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RebuildPolicy::Lenient => write!(f, "lenient"),
            RebuildPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Tunes the consolidation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsolidateOptions {
    /// Connected components with strictly fewer nodes than this are removed.
    pub prune_threshold: usize,
    /// A degree-2 node is only a cut candidate when the distance to both of its neighbors sums
    /// to less than this.
    pub max_cut_span_meters: f64,
    /// The full width of the window around the straight-ahead bearing where a cut is accepted.
    pub cut_angle_tolerance_degrees: f64,
    pub rebuild_policy: RebuildPolicy,
    /// Stop the cutting fixpoint after this many passes, even if the last pass still cut
    /// something.
    pub max_cut_passes: Option<usize>,
}

impl Default for ConsolidateOptions {
    fn default() -> ConsolidateOptions {
        ConsolidateOptions {
            prune_threshold: 200,
            max_cut_span_meters: 180.0,
            cut_angle_tolerance_degrees: 20.0,
            rebuild_policy: RebuildPolicy::Lenient,
            max_cut_passes: None,
        }
    }
}

impl ConsolidateOptions {
    pub fn from_raw(raw: RawConsolidateOptions) -> ConsolidateOptions {
        let defaults = ConsolidateOptions::default();
        ConsolidateOptions {
            prune_threshold: raw.prune_threshold.unwrap_or(defaults.prune_threshold),
            max_cut_span_meters: raw
                .max_cut_span_meters
                .unwrap_or(defaults.max_cut_span_meters),
            cut_angle_tolerance_degrees: raw
                .cut_angle_tolerance_degrees
                .unwrap_or(defaults.cut_angle_tolerance_degrees),
            rebuild_policy: raw.rebuild_policy.unwrap_or(defaults.rebuild_policy),
            max_cut_passes: raw.max_cut_passes.or(defaults.max_cut_passes),
        }
    }

    /// Reads a TOML file where every field is optional. Missing fields use the defaults.
    pub fn load(path: &str) -> Result<ConsolidateOptions> {
        ConsolidateOptions::layered(Some(path), RawConsolidateOptions::default())
    }

    /// Anything set in `overrides` wins, then anything in the optional config file, then the
    /// defaults.
    pub fn layered(
        config_path: Option<&str>,
        overrides: RawConsolidateOptions,
    ) -> Result<ConsolidateOptions> {
        let from_file = match config_path {
            Some(path) => abstutil::read_toml(path)?,
            None => RawConsolidateOptions::default(),
        };
        let opts = ConsolidateOptions::from_raw(overrides.or(from_file));
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_cut_span_meters.is_finite() || self.max_cut_span_meters < 0.0 {
            bail!(
                "max_cut_span_meters must be a non-negative number, not {}",
                self.max_cut_span_meters
            );
        }
        if !self.cut_angle_tolerance_degrees.is_finite()
            || self.cut_angle_tolerance_degrees < 0.0
            || self.cut_angle_tolerance_degrees >= 360.0
        {
            bail!(
                "cut_angle_tolerance_degrees must be in [0, 360), not {}",
                self.cut_angle_tolerance_degrees
            );
        }
        if self.max_cut_passes == Some(0) {
            bail!("max_cut_passes must be at least 1");
        }
        Ok(())
    }

    pub fn max_cut_span(&self) -> Distance {
        Distance::meters(self.max_cut_span_meters)
    }
}

/// The same settings, but everything is optional. This is the format of config files and the
/// set of command-line overrides.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, StructOpt)]
#[serde(deny_unknown_fields)]
pub struct RawConsolidateOptions {
    /// Connected components with fewer nodes are removed. Defaults to 200.
    #[structopt(long)]
    pub prune_threshold: Option<usize>,
    /// Only cut a degree-2 node if both edges together are shorter than this. Defaults to 180.
    #[structopt(long)]
    pub max_cut_span_meters: Option<f64>,
    /// Width of the window around the straight-ahead bearing where a cut is accepted. Defaults
    /// to 20.
    #[structopt(long)]
    pub cut_angle_tolerance_degrees: Option<f64>,
    /// "lenient" drops edges to unknown nodes, "strict" aborts. Defaults to lenient.
    #[structopt(long)]
    pub rebuild_policy: Option<RebuildPolicy>,
    /// Stop cutting after this many passes.
    #[structopt(long)]
    pub max_cut_passes: Option<usize>,
}

impl RawConsolidateOptions {
    /// Prefer values set here, falling back to `other` field by field.
    pub fn or(self, other: RawConsolidateOptions) -> RawConsolidateOptions {
        RawConsolidateOptions {
            prune_threshold: self.prune_threshold.or(other.prune_threshold),
            max_cut_span_meters: self.max_cut_span_meters.or(other.max_cut_span_meters),
            cut_angle_tolerance_degrees: self
                .cut_angle_tolerance_degrees
                .or(other.cut_angle_tolerance_degrees),
            rebuild_policy: self.rebuild_policy.or(other.rebuild_policy),
            max_cut_passes: self.max_cut_passes.or(other.max_cut_passes),
        }
    }
}
