//! Input adapters for the persist pipeline.
//!
//! - `table`: discovery and parsing of per-tree lineage record tables
//! - `tree`: NEXUS/Newick reference trees and the sampling dates on their tips

pub mod error;
pub mod table;
pub mod tree;

pub use error::{Error, Result};
pub use table::{discover_input_tables, read_records};
pub use tree::{calendar_date, load_reference_date, parse_reference_date, TipDatePattern};
