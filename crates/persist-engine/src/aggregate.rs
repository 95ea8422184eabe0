use crate::interval;
use crate::Result;
use persist_types::{BucketKey, CalendarSummary, GroupSummary, IntervalRow, ReferenceDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-tree quantity summarized across trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PropPersistentFromUnique,
    PersistentsFromUnique,
    IntroductionsFromUnique,
    PropDescendantsFromIntroductionsAtEval,
    IntroductionLineagesAtEval,
}

impl Metric {
    /// Column prefix used in output headers
    pub fn column_prefix(self) -> &'static str {
        match self {
            Metric::PropPersistentFromUnique => "propPersistentFromUnique",
            Metric::PersistentsFromUnique => "persistentsFromUnique",
            Metric::IntroductionsFromUnique => "introductionsFromUnique",
            Metric::PropDescendantsFromIntroductionsAtEval => {
                "propDescendantsFromIntroductionsAtEval"
            }
            Metric::IntroductionLineagesAtEval => "introductionLineagesAtEval",
        }
    }

    pub fn value(self, summary: &GroupSummary) -> f64 {
        match self {
            Metric::PropPersistentFromUnique => summary.prop_persistent_from_unique,
            Metric::PersistentsFromUnique => summary.persistent_unique as f64,
            Metric::IntroductionsFromUnique => summary.introduced_unique as f64,
            Metric::PropDescendantsFromIntroductionsAtEval => {
                summary.prop_descendants_from_introductions_at_eval()
            }
            Metric::IntroductionLineagesAtEval => summary.introduced_at_eval as f64,
        }
    }
}

/// The three output tables; same buckets, different metric subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryTable {
    SummaryStats,
    DescendantsSummary,
    IntroductionLineagesAtEvalStats,
}

impl SummaryTable {
    pub const ALL: [SummaryTable; 3] = [
        SummaryTable::SummaryStats,
        SummaryTable::DescendantsSummary,
        SummaryTable::IntroductionLineagesAtEvalStats,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SummaryTable::SummaryStats => "summary_stats",
            SummaryTable::DescendantsSummary => "descendants_summary",
            SummaryTable::IntroductionLineagesAtEvalStats => "introductionLineagesAtEvalStats",
        }
    }

    pub fn metrics(self) -> &'static [Metric] {
        match self {
            SummaryTable::SummaryStats => &[
                Metric::PropPersistentFromUnique,
                Metric::PersistentsFromUnique,
                Metric::IntroductionsFromUnique,
            ],
            SummaryTable::DescendantsSummary => &[Metric::PropDescendantsFromIntroductionsAtEval],
            SummaryTable::IntroductionLineagesAtEvalStats => {
                &[Metric::IntroductionLineagesAtEval]
            }
        }
    }

    /// `<location>_<name>.tsv`
    pub fn file_name(self, location: &str) -> String {
        format!("{}_{}.tsv", location, self.name())
    }

    /// Whether `file_name` looks like one of this tool's own outputs
    pub fn is_output_file_name(file_name: &str) -> bool {
        Self::ALL
            .iter()
            .any(|table| file_name.ends_with(&format!("_{}.tsv", table.name())))
    }

    pub fn header(self) -> Vec<String> {
        let mut header = vec![
            "ancestralTime".to_string(),
            "evaluationTime".to_string(),
            "mean_time".to_string(),
        ];
        for metric in self.metrics() {
            for stat in ["lower", "upper", "median"] {
                header.push(format!("{}_{}", metric.column_prefix(), stat));
            }
        }
        header
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rows of one output table, sorted by bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalTable {
    pub table: SummaryTable,
    pub rows: Vec<IntervalRow>,
}

/// Place each group summary on the calendar axis (`mrsd - raw`).
pub fn to_calendar(summaries: Vec<GroupSummary>, mrsd: ReferenceDate) -> Vec<CalendarSummary> {
    summaries
        .into_iter()
        .map(|summary| {
            let ancestral = mrsd.to_calendar(summary.key.ancestral_time);
            let evaluation = mrsd.to_calendar(summary.key.evaluation_time);
            CalendarSummary {
                bucket: BucketKey::new(ancestral, evaluation),
                summary,
            }
        })
        .collect()
}

/// Group summaries by bucket, preserving nothing but membership.
pub fn bucket_summaries(summaries: &[CalendarSummary]) -> BTreeMap<BucketKey, Vec<&GroupSummary>> {
    let mut buckets: BTreeMap<BucketKey, Vec<&GroupSummary>> = BTreeMap::new();
    for item in summaries {
        buckets.entry(item.bucket).or_default().push(&item.summary);
    }
    buckets
}

/// Summarize every metric of `table` across trees, one row per bucket.
pub fn aggregate(
    summaries: &[CalendarSummary],
    table: SummaryTable,
    probability: f64,
) -> Result<IntervalTable> {
    interval::check_probability(probability)?;

    let mut rows = Vec::new();
    for (bucket, members) in bucket_summaries(summaries) {
        let stats = table
            .metrics()
            .iter()
            .map(|metric| {
                let values: Vec<f64> = members.iter().map(|s| metric.value(s)).collect();
                interval::summarize(&values, probability)
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(IntervalRow { bucket, stats });
    }

    Ok(IntervalTable { table, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use persist_types::{GroupKey, TimeValue};

    fn t(v: f64) -> TimeValue {
        TimeValue::new("t", v).unwrap()
    }

    fn summary(tree: &str, eval: f64, anc: f64, counts: [u64; 4]) -> GroupSummary {
        let [persistent_at_eval, introduced_at_eval, persistent_unique, introduced_unique] = counts;
        let total_unique = persistent_unique + introduced_unique;
        GroupSummary {
            key: GroupKey {
                tree_id: tree.to_string(),
                evaluation_time: t(eval),
                ancestral_time: t(anc),
                state_at_evaluation_time: "Iraq".to_string(),
            },
            anc_eval_diff: anc - eval,
            persistent_at_eval,
            introduced_at_eval,
            persistent_unique,
            introduced_unique,
            prop_persistent_from_unique: if total_unique > 0 {
                persistent_unique as f64 / total_unique as f64
            } else {
                0.0
            },
            total_unique,
        }
    }

    fn mrsd() -> ReferenceDate {
        ReferenceDate::new(2022.0).unwrap()
    }

    #[test]
    fn test_headers() {
        insta::assert_snapshot!(SummaryTable::SummaryStats.header().join("\t"), @"ancestralTime	evaluationTime	mean_time	propPersistentFromUnique_lower	propPersistentFromUnique_upper	propPersistentFromUnique_median	persistentsFromUnique_lower	persistentsFromUnique_upper	persistentsFromUnique_median	introductionsFromUnique_lower	introductionsFromUnique_upper	introductionsFromUnique_median");
        assert_eq!(
            &SummaryTable::DescendantsSummary.header()[3..],
            &[
                "propDescendantsFromIntroductionsAtEval_lower",
                "propDescendantsFromIntroductionsAtEval_upper",
                "propDescendantsFromIntroductionsAtEval_median",
            ]
        );
        assert_eq!(SummaryTable::IntroductionLineagesAtEvalStats.header().len(), 6);
    }

    #[test]
    fn test_output_file_names() {
        assert_eq!(
            SummaryTable::DescendantsSummary.file_name("Iraq"),
            "Iraq_descendants_summary.tsv"
        );
        assert!(SummaryTable::is_output_file_name("Iraq_summary_stats.tsv"));
        assert!(SummaryTable::is_output_file_name(
            "Iran_introductionLineagesAtEvalStats.tsv"
        ));
        assert!(!SummaryTable::is_output_file_name("persistence.tsv"));
    }

    #[test]
    fn test_to_calendar_converts_and_averages() {
        let converted = to_calendar(vec![summary("1", 0.25, 0.5, [1, 1, 1, 1])], mrsd());

        let bucket = converted[0].bucket;
        assert_eq!(bucket.ancestral_time.get(), 2021.5);
        assert_eq!(bucket.evaluation_time.get(), 2021.75);
        assert_eq!(bucket.mean_time.get(), 2021.625);
    }

    #[test]
    fn test_buckets_are_sorted_and_pooled_across_trees() {
        let summaries = to_calendar(
            vec![
                summary("1", 0.0, 0.5, [1, 1, 1, 1]),
                summary("1", 0.0, 1.0, [3, 1, 3, 1]),
                summary("2", 0.0, 0.5, [1, 3, 0, 2]),
                summary("2", 0.0, 1.0, [1, 0, 1, 0]),
            ],
            mrsd(),
        );

        let table = aggregate(&summaries, SummaryTable::SummaryStats, 0.95).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].bucket.ancestral_time.get(), 2021.0);
        assert_eq!(table.rows[1].bucket.ancestral_time.get(), 2021.5);

        // propPersistentFromUnique over trees 1 and 2 at ancestral 2021.5: [0.5, 0.0]
        let prop = table.rows[1].stats[0];
        assert_eq!((prop.lower, prop.upper, prop.median), (0.0, 0.5, 0.25));
        // persistentsFromUnique at ancestral 2021.0: [3, 1]
        let persistents = table.rows[0].stats[1];
        assert_eq!(persistents.median, 2.0);
    }

    #[test]
    fn test_single_tree_gives_degenerate_intervals() {
        let summaries = to_calendar(
            vec![
                summary("only", 0.0, 0.5, [2, 1, 1, 1]),
                summary("only", 0.25, 0.5, [0, 4, 0, 3]),
            ],
            mrsd(),
        );

        for table in SummaryTable::ALL {
            let result = aggregate(&summaries, table, 0.95).unwrap();
            for row in &result.rows {
                for stats in &row.stats {
                    assert_eq!(stats.lower, stats.upper);
                    assert_eq!(stats.lower, stats.median);
                }
            }
        }
    }

    #[test]
    fn test_descendant_proportion_zero_over_zero_reaches_output() {
        let summaries = to_calendar(vec![summary("1", 0.0, 0.5, [0, 0, 0, 0])], mrsd());

        let table = aggregate(&summaries, SummaryTable::DescendantsSummary, 0.95).unwrap();

        let stats = table.rows[0].stats[0];
        assert!(stats.lower.is_nan());
        assert!(stats.upper.is_nan());
        assert!(stats.median.is_nan());

        // the guarded proportion stays at zero for the same group
        let guarded = aggregate(&summaries, SummaryTable::SummaryStats, 0.95).unwrap();
        assert_eq!(guarded.rows[0].stats[0].median, 0.0);
    }

    #[test]
    fn test_one_undefined_descendant_proportion_leaves_median_defined() {
        // descendants proportions per tree: 0.5, 0/0, 0.25, 1.0
        let summaries = to_calendar(
            vec![
                summary("1", 0.0, 0.5, [1, 1, 0, 0]),
                summary("2", 0.0, 0.5, [0, 0, 0, 0]),
                summary("3", 0.0, 0.5, [3, 1, 0, 0]),
                summary("4", 0.0, 0.5, [0, 2, 0, 0]),
            ],
            mrsd(),
        );

        let table = aggregate(&summaries, SummaryTable::DescendantsSummary, 0.95).unwrap();

        assert_eq!(table.rows.len(), 1);
        let stats = table.rows[0].stats[0];
        assert_eq!(stats.lower, 0.25);
        assert!(stats.upper.is_nan());
        assert_eq!(stats.median, 0.5);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let table = aggregate(&[], SummaryTable::IntroductionLineagesAtEvalStats, 0.95).unwrap();
        assert!(table.rows.is_empty());
    }
}
