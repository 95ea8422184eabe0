//! Assertions over written output tables.

use anyhow::{Context, Result};
use std::path::Path;

/// Read a tab-separated table into its header and data rows.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut lines = content.lines();
    let header = lines
        .next()
        .with_context(|| format!("{} is empty", path.display()))?
        .split('\t')
        .map(str::to_string)
        .collect();
    let rows = lines
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();
    Ok((header, rows))
}

/// Assert that a table has exactly `expected` data rows.
pub fn assert_row_count(path: &Path, expected: usize) -> Result<()> {
    let (_, rows) = read_table(path)?;
    if rows.len() != expected {
        anyhow::bail!(
            "Expected {} rows in {}, got {}",
            expected,
            path.display(),
            rows.len()
        );
    }
    Ok(())
}

/// Assert that a table starts with the time columns and has no data rows.
pub fn assert_header_only(path: &Path) -> Result<()> {
    let (header, _) = read_table(path)?;
    if header.len() < 3 || header[..3] != ["ancestralTime", "evaluationTime", "mean_time"] {
        anyhow::bail!("Unexpected header in {}: {:?}", path.display(), header);
    }
    assert_row_count(path, 0)
}

/// Value of `column` in data row `row`.
pub fn cell(path: &Path, row: usize, column: &str) -> Result<String> {
    let (header, rows) = read_table(path)?;
    let index = header
        .iter()
        .position(|h| h == column)
        .with_context(|| format!("No column {} in {}", column, path.display()))?;
    rows.get(row)
        .and_then(|r| r.get(index))
        .cloned()
        .with_context(|| format!("No row {} in {}", row, path.display()))
}
