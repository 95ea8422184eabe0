use crate::types::{LogLevel, OutputFormat};
use clap::Parser;
use persist_runtime::Settings;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "persist.toml";

#[derive(Parser, Debug)]
#[command(name = "persist")]
#[command(
    about = "Summarize lineage persistence and introductions across posterior trees",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// TOML file with default settings; ignored when missing
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Location whose lineages are summarized [default: Iraq]
    #[arg(long)]
    pub location: Option<String>,

    /// Lineage directory under the output root [default: delta5]
    #[arg(long)]
    pub lineage: Option<String>,

    /// Reference tree (NEXUS or Newick) [default: tree.nexus]
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Root holding `<lineage>/` inputs and outputs [default: ./output]
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Probability mass of the highest density interval [default: 0.95]
    #[arg(long)]
    pub hdi_prob: Option<f64>,

    /// Fixed most recent sampling date, as a decimal year or YYYY-MM-DD
    #[arg(long)]
    pub mrsd: Option<String>,

    /// Regex locating the sampling date in tip names
    #[arg(long)]
    pub tip_date_regex: Option<String>,

    /// Reject groups whose rows disagree on ancestral/evaluation offset
    #[arg(long)]
    pub strict: bool,

    #[arg(long, default_value = "plain")]
    pub format: OutputFormat,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Settings given on the command line; unset flags stay `None`.
    pub fn settings(&self) -> Settings {
        Settings {
            location: self.location.clone(),
            lineage: self.lineage.clone(),
            tree: self.tree.clone(),
            output_root: self.output_root.clone(),
            hdi_prob: self.hdi_prob,
            tip_date_regex: self.tip_date_regex.clone(),
            mrsd: self.mrsd.clone(),
            strict: self.strict.then_some(true),
        }
    }
}
