use super::record::GroupKey;
use super::time::TimeValue;
use serde::{Deserialize, Serialize};

/// Persistence/introduction counts for one group of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub key: GroupKey,
    pub anc_eval_diff: f64,
    pub persistent_at_eval: u64,
    pub introduced_at_eval: u64,
    pub persistent_unique: u64,
    pub introduced_unique: u64,
    /// Zero when `total_unique` is zero
    pub prop_persistent_from_unique: f64,
    pub total_unique: u64,
}

impl GroupSummary {
    /// Share of lineages at evaluation time that descend from introductions.
    ///
    /// Unguarded: yields NaN when both counts are zero.
    pub fn prop_descendants_from_introductions_at_eval(&self) -> f64 {
        let introduced = self.introduced_at_eval as f64;
        let persistent = self.persistent_at_eval as f64;
        introduced / (introduced + persistent)
    }
}

/// Calendar-converted time coordinates shared across trees.
///
/// Field order is the output sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKey {
    pub ancestral_time: TimeValue,
    pub evaluation_time: TimeValue,
    pub mean_time: TimeValue,
}

impl BucketKey {
    pub fn new(ancestral_time: TimeValue, evaluation_time: TimeValue) -> Self {
        Self {
            ancestral_time,
            evaluation_time,
            mean_time: ancestral_time.midpoint(evaluation_time),
        }
    }
}

/// A group summary placed on the calendar axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub bucket: BucketKey,
    pub summary: GroupSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalStats {
    pub lower: f64,
    pub upper: f64,
    pub median: f64,
}

/// One output row: a bucket and the interval of every tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRow {
    pub bucket: BucketKey,
    pub stats: Vec<IntervalStats>,
}
