use crate::{Error, Result};
use csv::{ByteRecord, ReaderBuilder};
use persist_types::{LineageRecord, TimeValue};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub const TREE_ID: &str = "treeId";
pub const EVALUATION_TIME: &str = "evaluationTime";
pub const ANCESTRAL_TIME: &str = "ancestralTime";
pub const STATE_AT_EVALUATION_TIME: &str = "stateAtEvaluationTime";
pub const PERSISTENCE_TIME: &str = "persistenceTime";
pub const INDEPENDENCE_TIME: &str = "independenceTime";

/// Read every lineage record from a comma- or tab-separated file.
pub fn read_records(path: &Path) -> Result<Vec<LineageRecord>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let delimiter = sniff_delimiter(reader.fill_buf()?);
    read_records_from(reader, delimiter)
}

/// Tab if the header line contains one, comma otherwise.
pub fn sniff_delimiter(head: &[u8]) -> u8 {
    let header_line = head.split(|&b| b == b'\n').next().unwrap_or(head);
    if header_line.contains(&b'\t') {
        b'\t'
    } else {
        b','
    }
}

/// Drop every byte outside the ASCII range.
pub fn normalize_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect()
}

pub fn read_records_from<R: Read>(reader: R, delimiter: u8) -> Result<Vec<LineageRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(csv_reader.byte_headers()?)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while csv_reader.read_byte_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        records.push(columns.parse(&row, line)?);
    }
    Ok(records)
}

struct ColumnIndex {
    tree_id: usize,
    evaluation_time: usize,
    ancestral_time: usize,
    state: usize,
    persistence_time: usize,
    independence_time: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &ByteRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| normalize_ascii(h).trim() == name)
                .ok_or_else(|| Error::MalformedRecord {
                    line: 1,
                    message: format!("missing required column {}", name),
                })
        };

        Ok(Self {
            tree_id: find(TREE_ID)?,
            evaluation_time: find(EVALUATION_TIME)?,
            ancestral_time: find(ANCESTRAL_TIME)?,
            state: find(STATE_AT_EVALUATION_TIME)?,
            persistence_time: find(PERSISTENCE_TIME)?,
            independence_time: find(INDEPENDENCE_TIME)?,
        })
    }

    fn parse(&self, row: &ByteRecord, line: u64) -> Result<LineageRecord> {
        Ok(LineageRecord {
            tree_id: String::from_utf8_lossy(field(row, self.tree_id, TREE_ID, line)?).into_owned(),
            evaluation_time: time(row, self.evaluation_time, EVALUATION_TIME, line)?,
            ancestral_time: time(row, self.ancestral_time, ANCESTRAL_TIME, line)?,
            persistence_time: time(row, self.persistence_time, PERSISTENCE_TIME, line)?,
            independence_time: time(row, self.independence_time, INDEPENDENCE_TIME, line)?,
            state_at_evaluation_time: normalize_ascii(field(
                row,
                self.state,
                STATE_AT_EVALUATION_TIME,
                line,
            )?),
        })
    }
}

fn field<'r>(row: &'r ByteRecord, index: usize, name: &str, line: u64) -> Result<&'r [u8]> {
    row.get(index).ok_or_else(|| Error::MalformedRecord {
        line,
        message: format!("missing value for {}", name),
    })
}

fn time(row: &ByteRecord, index: usize, name: &'static str, line: u64) -> Result<TimeValue> {
    let raw = field(row, index, name, line)?;
    let text = std::str::from_utf8(raw).unwrap_or("").trim();
    let malformed = |message: String| Error::MalformedRecord { line, message };

    let value: f64 = text
        .parse()
        .map_err(|_| malformed(format!("{} is not a number: {:?}", name, text)))?;
    TimeValue::new(name, value).map_err(|e| malformed(e.to_string()))
}
