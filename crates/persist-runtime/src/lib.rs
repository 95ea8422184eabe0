//! Pipeline driver for lineage persistence summaries.
//!
//! Resolves configuration, locates the input table and reference date,
//! runs the engine and writes the output tables.

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;

pub use config::{Settings, SummaryConfig};
pub use error::{Error, Result};
pub use pipeline::{run, RunReport};
