// persist: lineage persistence summaries across posterior trees
//
// Reads per-tree lineage records for one lineage, keeps the rows at one
// location, classifies persistent versus introduced lineages per tree and
// summarizes each metric across trees with a median and HDI bounds.

mod args;
mod commands;
pub mod types;

pub use args::{Cli, DEFAULT_CONFIG_FILE};
pub use commands::run;
