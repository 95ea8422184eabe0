use crate::{Error, Result};
use persist_engine::{SummaryTable, DEFAULT_HDI_PROB};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCATION: &str = "Iraq";
pub const DEFAULT_LINEAGE: &str = "delta5";
pub const DEFAULT_TREE: &str = "tree.nexus";
pub const DEFAULT_OUTPUT_ROOT: &str = "./output";

/// Optional settings as they appear in a TOML file or on the command line.
///
/// Every field is optional so layers can be merged; see [`Settings::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub location: Option<String>,
    pub lineage: Option<String>,
    pub tree: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
    pub hdi_prob: Option<f64>,
    pub tip_date_regex: Option<String>,
    pub mrsd: Option<String>,
    pub strict: Option<bool>,
}

impl Settings {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: Settings) -> Settings {
        Settings {
            location: other.location.or(self.location),
            lineage: other.lineage.or(self.lineage),
            tree: other.tree.or(self.tree),
            output_root: other.output_root.or(self.output_root),
            hdi_prob: other.hdi_prob.or(self.hdi_prob),
            tip_date_regex: other.tip_date_regex.or(self.tip_date_regex),
            mrsd: other.mrsd.or(self.mrsd),
            strict: other.strict.or(self.strict),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryConfig {
    pub location: String,
    pub lineage: String,
    pub tree: PathBuf,
    pub output_root: PathBuf,
    pub hdi_prob: f64,
    /// `None` uses the default tip date pattern
    pub tip_date_regex: Option<String>,
    /// Fixed reference date; `None` derives it from `tree`
    pub mrsd: Option<String>,
    pub strict: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            lineage: DEFAULT_LINEAGE.to_string(),
            tree: PathBuf::from(DEFAULT_TREE),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            hdi_prob: DEFAULT_HDI_PROB,
            tip_date_regex: None,
            mrsd: None,
            strict: false,
        }
    }
}

impl SummaryConfig {
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            location: settings.location.unwrap_or(defaults.location),
            lineage: settings.lineage.unwrap_or(defaults.lineage),
            tree: settings.tree.unwrap_or(defaults.tree),
            output_root: settings.output_root.unwrap_or(defaults.output_root),
            hdi_prob: settings.hdi_prob.unwrap_or(defaults.hdi_prob),
            tip_date_regex: settings.tip_date_regex,
            mrsd: settings.mrsd,
            strict: settings.strict.unwrap_or(defaults.strict),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.location.is_empty() {
            return Err(Error::Config("location must not be empty".to_string()));
        }
        if self.lineage.is_empty() {
            return Err(Error::Config("lineage must not be empty".to_string()));
        }
        if !(self.hdi_prob > 0.0 && self.hdi_prob < 1.0) {
            return Err(Error::Config(format!(
                "hdi_prob must lie strictly between 0 and 1, got {}",
                self.hdi_prob
            )));
        }
        Ok(())
    }

    /// Directory searched for input tables and holding the outputs
    pub fn lineage_dir(&self) -> PathBuf {
        self.output_root.join(&self.lineage)
    }

    pub fn output_path(&self, table: SummaryTable) -> PathBuf {
        self.lineage_dir().join(table.file_name(&self.location))
    }
}
