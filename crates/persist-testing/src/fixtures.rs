//! Builders for input fixtures.
//!
//! - `RecordTable`: lineage record tables in the upstream column layout
//! - `DatedTree`: NEXUS trees whose tip names carry sampling dates

pub const RECORD_COLUMNS: [&str; 6] = [
    "treeId",
    "evaluationTime",
    "ancestralTime",
    "stateAtEvaluationTime",
    "persistenceTime",
    "independenceTime",
];

/// Lineage record table; tab-separated unless built with [`RecordTable::csv`].
#[derive(Debug, Clone)]
pub struct RecordTable {
    delimiter: char,
    rows: Vec<[String; 6]>,
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordTable {
    pub fn new() -> Self {
        Self {
            delimiter: '\t',
            rows: Vec::new(),
        }
    }

    pub fn csv() -> Self {
        Self {
            delimiter: ',',
            rows: Vec::new(),
        }
    }

    /// Append one record.
    pub fn row(
        mut self,
        tree_id: &str,
        evaluation_time: f64,
        ancestral_time: f64,
        location: &str,
        persistence_time: f64,
        independence_time: f64,
    ) -> Self {
        self.rows.push([
            tree_id.to_string(),
            evaluation_time.to_string(),
            ancestral_time.to_string(),
            location.to_string(),
            persistence_time.to_string(),
            independence_time.to_string(),
        ]);
        self
    }

    pub fn render(&self) -> String {
        let sep = self.delimiter.to_string();
        let mut out = RECORD_COLUMNS.join(&sep);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.join(&sep));
            out.push('\n');
        }
        out
    }
}

/// Star tree whose tips are named `<name>|<date>`.
///
/// The reference date of such a tree is its latest tip date.
#[derive(Debug, Clone, Default)]
pub struct DatedTree {
    tips: Vec<(String, String, f64)>,
}

impl DatedTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tip(mut self, name: &str, date: &str, branch_length: f64) -> Self {
        self.tips
            .push((name.to_string(), date.to_string(), branch_length));
        self
    }

    /// Render with a `Translate` block and numbered tips.
    pub fn to_nexus(&self) -> String {
        let entries: Vec<String> = self
            .tips
            .iter()
            .enumerate()
            .map(|(i, (name, date, _))| format!("\t\t{} '{}|{}'", i + 1, name, date))
            .collect();
        let leaves: Vec<String> = self
            .tips
            .iter()
            .enumerate()
            .map(|(i, (_, _, length))| format!("{}[&state=\"unknown\"]:{}", i + 1, length))
            .collect();

        format!(
            "#NEXUS\n\nBegin trees;\n\tTranslate\n{}\n;\ntree TREE1 = [&R] ({});\nEnd;\n",
            entries.join(",\n"),
            leaves.join(",")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_table_render() {
        let table = RecordTable::csv().row("1", 0.25, 0.5, "Iraq", 1.0, 0.1);
        assert_eq!(
            table.render(),
            "treeId,evaluationTime,ancestralTime,stateAtEvaluationTime,persistenceTime,independenceTime\n1,0.25,0.5,Iraq,1,0.1\n"
        );
    }

    #[test]
    fn test_dated_tree_nexus() {
        let nexus = DatedTree::new()
            .tip("A", "2021-07-01", 0.5)
            .tip("B", "2022-01-01", 1.0)
            .to_nexus();

        assert!(nexus.starts_with("#NEXUS"));
        assert!(nexus.contains("\t\t1 'A|2021-07-01',\n\t\t2 'B|2022-01-01'\n;"));
        assert!(nexus.contains("tree TREE1 = [&R] (1[&state=\"unknown\"]:0.5,2[&state=\"unknown\"]:1);"));
    }
}
