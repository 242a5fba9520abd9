//! A grab-bag of things shared by the other crates:
//!
//! - Timer, for nested progress logging of long-running stages
//! - IO utilities for JSON and TOML files
//! - true utilities like Counter and prettyprint_usize

#[macro_use]
extern crate log;

mod collections;
mod io;
pub mod logger;
mod time;

pub use crate::collections::Counter;
pub use crate::io::{read_json, read_toml, to_json, write_json};
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};
