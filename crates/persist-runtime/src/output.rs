use crate::Result;
use persist_engine::IntervalTable;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write `table` as a tab-separated file, creating parent directories.
///
/// An empty table still gets its header line.
pub fn write_table(path: &Path, table: &IntervalTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_table_to(file, table)
}

pub fn write_table_to<W: Write>(writer: W, table: &IntervalTable) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    wtr.write_record(table.table.header())?;

    for row in &table.rows {
        let mut record = vec![
            format_value(row.bucket.ancestral_time.get()),
            format_value(row.bucket.evaluation_time.get()),
            format_value(row.bucket.mean_time.get()),
        ];
        for stats in &row.stats {
            record.push(format_value(stats.lower));
            record.push(format_value(stats.upper));
            record.push(format_value(stats.median));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Shortest round-tripping decimal; NaN is written as `NaN`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persist_engine::SummaryTable;
    use persist_types::{BucketKey, IntervalRow, IntervalStats, TimeValue};
    use tempfile::TempDir;

    fn t(v: f64) -> TimeValue {
        TimeValue::new("t", v).unwrap()
    }

    fn render(table: &IntervalTable) -> String {
        let mut buf = Vec::new();
        write_table_to(&mut buf, table).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2021.25), "2021.25");
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let table = IntervalTable {
            table: SummaryTable::IntroductionLineagesAtEvalStats,
            rows: Vec::new(),
        };

        assert_eq!(
            render(&table),
            "ancestralTime\tevaluationTime\tmean_time\tintroductionLineagesAtEval_lower\tintroductionLineagesAtEval_upper\tintroductionLineagesAtEval_median\n"
        );
    }

    #[test]
    fn test_rows_are_tab_separated() {
        let table = IntervalTable {
            table: SummaryTable::DescendantsSummary,
            rows: vec![IntervalRow {
                bucket: BucketKey::new(t(2021.5), t(2021.75)),
                stats: vec![IntervalStats {
                    lower: 0.25,
                    upper: f64::NAN,
                    median: f64::NAN,
                }],
            }],
        };

        let text = render(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2021.5\t2021.75\t2021.625\t0.25\tNaN\tNaN");
    }

    #[test]
    fn test_write_table_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("delta5").join("Iraq_summary_stats.tsv");
        let table = IntervalTable {
            table: SummaryTable::SummaryStats,
            rows: Vec::new(),
        };

        write_table(&path, &table).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("ancestralTime\tevaluationTime\tmean_time\tpropPersistentFromUnique_lower"));
    }
}
