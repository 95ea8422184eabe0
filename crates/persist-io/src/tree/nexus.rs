use super::newick::PhyloTree;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A parsed tree file: the first tree plus its tip translation table.
#[derive(Debug, Clone)]
pub struct TreeFile {
    pub tree: PhyloTree,
    /// `Translate` entries (tip number -> taxon name); empty for Newick input
    pub translate: HashMap<String, String>,
}

impl TreeFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse NEXUS text (`#NEXUS` header) or fall back to bare Newick.
    pub fn parse(text: &str) -> Result<Self> {
        if !text.trim_start().to_ascii_lowercase().starts_with("#nexus") {
            return Ok(Self {
                tree: PhyloTree::parse_newick(text.trim())?,
                translate: HashMap::new(),
            });
        }

        let lines: Vec<&str> = text.lines().collect();
        let trees_block = lines
            .iter()
            .position(|l| l.trim().to_ascii_lowercase().starts_with("begin trees"))
            .ok_or_else(|| Error::Tree("NEXUS file has no trees block".to_string()))?;

        let mut translate = HashMap::new();
        let mut idx = trees_block + 1;
        while idx < lines.len() {
            let line = lines[idx].trim();
            let lower = line.to_ascii_lowercase();

            if lower.starts_with("translate") {
                let (entries, next) = collect_statement(&lines, idx, "translate".len());
                translate = parse_translate(&entries);
                idx = next;
                continue;
            }

            if lower.starts_with("tree ") || lower.starts_with("utree ") {
                let rest = lines[idx..].join("\n");
                let eq = tree_body_start(&rest)
                    .ok_or_else(|| Error::Tree(format!("tree statement without '=': {}", line)))?;
                let tree = PhyloTree::parse_newick(&rest[eq + 1..])?;
                return Ok(Self { tree, translate });
            }

            if lower.starts_with("end;") {
                break;
            }
            idx += 1;
        }

        Err(Error::Tree("NEXUS trees block contains no tree".to_string()))
    }

    /// Taxon name of every tip, translated and unquoted.
    pub fn tip_names(&self) -> Vec<String> {
        self.tree
            .tips()
            .filter_map(|tip| tip.label.as_deref())
            .map(|label| {
                let name = self.translate.get(label).map(String::as_str).unwrap_or(label);
                unquote(name).to_string()
            })
            .collect()
    }
}

/// Byte index of the `=` that opens the tree body, skipping `[...]`
/// comments such as `[&lnP=-1.5]` in the statement header.
fn tree_body_start(statement: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, b) in statement.bytes().enumerate() {
        match b {
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Join lines from `start` (skipping the keyword) up to the closing `;`.
fn collect_statement(lines: &[&str], start: usize, keyword_len: usize) -> (String, usize) {
    let mut body = String::new();
    let mut idx = start;
    while idx < lines.len() {
        let line = if idx == start {
            &lines[idx].trim()[keyword_len..]
        } else {
            lines[idx].trim()
        };
        idx += 1;
        if let Some(end) = line.find(';') {
            body.push_str(&line[..end]);
            break;
        }
        body.push_str(line);
        body.push('\n');
    }
    (body, idx)
}

fn parse_translate(entries: &str) -> HashMap<String, String> {
    entries
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (key, name) = entry.split_once(char::is_whitespace)?;
            Some((key.to_string(), unquote(name.trim()).to_string()))
        })
        .collect()
}

fn unquote(name: &str) -> &str {
    name.trim_matches(|c| c == '\'' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEXUS: &str = "#NEXUS

Begin taxa;
\tDimensions ntax=3;
\tTaxlabels
\t\t'A/Iraq/1|2021-05-01'
\t\t'B/Iran/2|2021-06-15'
\t\t'C/Iraq/3|2021-12-31'
\t\t;
End;
Begin trees;
\tTranslate
\t\t1 'A/Iraq/1|2021-05-01',
\t\t2 'B/Iran/2|2021-06-15',
\t\t3 'C/Iraq/3|2021-12-31'
;
tree TREE1 = [&R] ((1[&state=\"Iraq\"]:0.25,2:0.5)[&state=\"Iraq\"]:0.25,3:1.0);
End;
";

    #[test]
    fn test_parse_nexus_with_translate() {
        let file = TreeFile::parse(NEXUS).unwrap();

        assert_eq!(file.translate.len(), 3);
        assert_eq!(file.translate["2"], "B/Iran/2|2021-06-15");
        assert_eq!(
            file.tip_names(),
            vec![
                "A/Iraq/1|2021-05-01",
                "B/Iran/2|2021-06-15",
                "C/Iraq/3|2021-12-31"
            ]
        );
        assert_eq!(file.tree.tree_height(), 1.0);
    }

    #[test]
    fn test_nexus_without_translate_uses_labels() {
        let text = "#NEXUS\nbegin trees;\n  tree t1 = ('x|2020-01-01':1,'y|2020-07-01':0.5);\nend;\n";
        let file = TreeFile::parse(text).unwrap();

        assert!(file.translate.is_empty());
        assert_eq!(file.tip_names(), vec!["x|2020-01-01", "y|2020-07-01"]);
    }

    #[test]
    fn test_bare_newick() {
        let file = TreeFile::parse("(a|2020-01-01:1,b|2020-02-01:2);\n").unwrap();
        assert_eq!(file.tip_names(), vec!["a|2020-01-01", "b|2020-02-01"]);
    }

    #[test]
    fn test_first_tree_is_used() {
        let text = "#NEXUS\nbegin trees;\ntree a = (x:1,y:1);\ntree b = (x:5,y:5);\nend;\n";
        let file = TreeFile::parse(text).unwrap();
        assert_eq!(file.tree.tree_height(), 1.0);
    }

    #[test]
    fn test_commented_tree_header() {
        let text = "#NEXUS\nbegin trees;\n\
                    tree STATE_0 [&lnP=-1.5,posterior=-2.5] = [&R] ('a|2022-01-01':1,'b|2021-01-01':0.5);\n\
                    end;\n";
        let file = TreeFile::parse(text).unwrap();

        assert_eq!(file.tip_names(), vec!["a|2022-01-01", "b|2021-01-01"]);
        assert_eq!(file.tree.tree_height(), 1.0);
    }

    #[test]
    fn test_tree_body_start_skips_comments() {
        assert_eq!(tree_body_start("tree t = (a,b);"), Some(7));
        assert_eq!(tree_body_start("tree t [&x=1] = (a,b);"), Some(14));
        assert_eq!(tree_body_start("tree t [&x=1]"), None);
    }

    #[test]
    fn test_nexus_without_trees_fails() {
        assert!(matches!(
            TreeFile::parse("#NEXUS\nbegin taxa;\nend;\n"),
            Err(Error::Tree(_))
        ));
        assert!(matches!(
            TreeFile::parse("#NEXUS\nbegin trees;\nend;\n"),
            Err(Error::Tree(_))
        ));
    }
}
