//! Testing infrastructure for persist integration tests.
//!
//! - `TestWorld`: isolated directory layout plus binary execution
//! - `fixtures`: builders for lineage record tables and dated trees
//! - `assertions`: checks over written output tables

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
