use crate::config::SummaryConfig;
use crate::output::write_table;
use crate::Result;
use persist_engine::SummaryTable;
use persist_io::{
    calendar_date, discover_input_tables, load_reference_date, parse_reference_date,
    read_records, TipDatePattern,
};
use persist_types::{CalendarSummary, LineageRecord, ReferenceDate, TimeValue};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// What a run read, derived and wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub location: String,
    pub lineage: String,
    pub input: PathBuf,
    /// Every candidate table found; only `input` is read
    pub discovered: Vec<PathBuf>,
    pub mrsd: f64,
    pub mrsd_date: String,
    pub rows_read: usize,
    pub rows_matched: usize,
    pub groups: usize,
    pub buckets: usize,
    pub outputs: Vec<PathBuf>,
}

/// Summarize one lineage at one location and write the three tables.
///
/// Nothing is written unless input discovery, reading and the reference
/// date all succeed.
pub fn run(config: &SummaryConfig) -> Result<RunReport> {
    let search_root = config.lineage_dir();
    let discovered = discover_input_tables(&search_root, SummaryTable::is_output_file_name)?;
    for path in &discovered {
        info!("Discovered input table {}", path.display());
    }
    // Only the first table is used even when several exist.
    let input = discovered[0].clone();
    if discovered.len() > 1 {
        warn!(
            "{} input tables found under {}; using {}",
            discovered.len(),
            search_root.display(),
            input.display()
        );
    }

    let records = read_records(&input)?;
    info!("Read {} records from {}", records.len(), input.display());

    let mrsd = resolve_reference_date(config)?;
    let mrsd_date = calendar_date(mrsd.decimal_year())?;
    info!("Most recent sampling date: {} ({})", mrsd.decimal_year(), mrsd_date);

    let rows_read = records.len();
    let matched: Vec<LineageRecord> = records
        .into_iter()
        .filter(|r| r.state_at_evaluation_time == config.location)
        .collect();
    info!("{} of {} records are at {}", matched.len(), rows_read, config.location);

    let summaries = persist_engine::classify(&matched, config.strict)?;
    let groups = summaries.len();
    info!("Classified {} groups", groups);

    let (calendar, tables) = persist_engine::summarize_tables(summaries, mrsd, config.hdi_prob)?;
    log_value_counts(&calendar);
    let buckets = tables.first().map_or(0, |t| t.rows.len());

    let mut outputs = Vec::with_capacity(tables.len());
    for table in &tables {
        let path = config.output_path(table.table);
        write_table(&path, table)?;
        info!("Wrote {} rows to {}", table.rows.len(), path.display());
        outputs.push(path);
    }

    Ok(RunReport {
        location: config.location.clone(),
        lineage: config.lineage.clone(),
        input,
        discovered,
        mrsd: mrsd.decimal_year(),
        mrsd_date,
        rows_read,
        rows_matched: matched.len(),
        groups,
        buckets,
        outputs,
    })
}

fn resolve_reference_date(config: &SummaryConfig) -> Result<ReferenceDate> {
    if let Some(fixed) = &config.mrsd {
        info!("Using fixed reference date {}", fixed);
        return Ok(parse_reference_date(fixed)?);
    }

    let pattern = match &config.tip_date_regex {
        Some(regex) => TipDatePattern::new(regex)?,
        None => TipDatePattern::default(),
    };
    info!("Loading reference tree {}", config.tree.display());
    Ok(load_reference_date(&config.tree, &pattern)?)
}

fn log_value_counts(calendar: &[CalendarSummary]) {
    let mut evaluation: BTreeMap<TimeValue, usize> = BTreeMap::new();
    let mut ancestral: BTreeMap<TimeValue, usize> = BTreeMap::new();
    let mut trees = BTreeSet::new();
    for item in calendar {
        *evaluation.entry(item.bucket.evaluation_time).or_default() += 1;
        *ancestral.entry(item.bucket.ancestral_time).or_default() += 1;
        trees.insert(item.summary.key.tree_id.as_str());
    }

    debug!("{} trees contribute group summaries", trees.len());
    for (value, count) in &evaluation {
        debug!("evaluationTime {}: {}", value, count);
    }
    for (value, count) in &ancestral {
        debug!("ancestralTime {}: {}", value, count);
    }
}
