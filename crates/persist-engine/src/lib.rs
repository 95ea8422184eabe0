// Engine module - classification and cross-tree aggregation
// This layer sits between parsed records (types) and the pipeline driver (runtime)

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod interval;

pub use aggregate::{IntervalTable, Metric, SummaryTable};
pub use error::{Error, Result};
pub use interval::DEFAULT_HDI_PROB;

use persist_types::{CalendarSummary, GroupSummary, LineageRecord, ReferenceDate};

// Façade API - stable entry points for the runtime layer

/// Classify every (tree, evaluation, ancestral, location) group of records
pub fn classify(records: &[LineageRecord], strict: bool) -> Result<Vec<GroupSummary>> {
    classify::classify_records(records, strict)
}

/// Convert group summaries to calendar time and summarize all three tables
pub fn summarize_tables(
    summaries: Vec<GroupSummary>,
    mrsd: ReferenceDate,
    probability: f64,
) -> Result<(Vec<CalendarSummary>, Vec<IntervalTable>)> {
    let calendar = aggregate::to_calendar(summaries, mrsd);
    let tables = SummaryTable::ALL
        .iter()
        .map(|&table| aggregate::aggregate(&calendar, table, probability))
        .collect::<Result<Vec<_>>>()?;
    Ok((calendar, tables))
}
