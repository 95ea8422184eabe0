//! TestWorld pattern for declarative integration test setup.
//!
//! Every world owns a temporary directory that serves as the working
//! directory of the binary, with `output/` as the output root.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use persist_testing::TestWorld;
/// use persist_testing::fixtures::{DatedTree, RecordTable};
///
/// let world = TestWorld::new()
///     .with_records("delta5", "run1/persistence.tsv", &RecordTable::new().render())
///     .with_tree("tree.nexus", &DatedTree::new().tip("A", "2022-01-01", 1.0).to_nexus());
///
/// let result = world.run(&["--lineage", "delta5"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    output_root: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_root = temp_dir.path().join("output");
        std::fs::create_dir_all(&output_root).expect("Failed to create output root");

        Self {
            temp_dir,
            output_root,
            env_vars: HashMap::new(),
        }
    }

    /// Get the output root (`<temp>/output`).
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn lineage_dir(&self, lineage: &str) -> PathBuf {
        self.output_root.join(lineage)
    }

    /// Path of an output table, e.g. `output_path("delta5", "Iraq", "summary_stats")`.
    pub fn output_path(&self, lineage: &str, location: &str, table: &str) -> PathBuf {
        self.lineage_dir(lineage)
            .join(format!("{}_{}.tsv", location, table))
    }

    /// Place a record table at `<output>/<lineage>/<relative_path>`.
    pub fn with_records(self, lineage: &str, relative_path: &str, content: &str) -> Self {
        let path = self.lineage_dir(lineage).join(relative_path);
        write_file(&path, content.as_bytes());
        self
    }

    /// Place raw bytes as a record table, for non-UTF-8 input.
    pub fn with_record_bytes(self, lineage: &str, relative_path: &str, content: &[u8]) -> Self {
        let path = self.lineage_dir(lineage).join(relative_path);
        write_file(&path, content);
        self
    }

    /// Place a tree file relative to the working directory.
    pub fn with_tree(self, name: &str, content: &str) -> Self {
        write_file(&self.temp_dir.path().join(name), content.as_bytes());
        self
    }

    /// Write `persist.toml` in the working directory.
    pub fn with_config(self, content: &str) -> Self {
        write_file(&self.temp_dir.path().join("persist.toml"), content.as_bytes());
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// The caller provides the base command (e.g. from `cargo_bin_cmd!("persist")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--output-root").arg(&self.output_root);
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("RUST_LOG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `persist` binary with `args` and capture its output.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("persist")
            .map_err(|e| anyhow::anyhow!("Failed to find persist binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(path, content).expect("Failed to write fixture");
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
