use super::dates::{decimal_date, DEFAULT_TIP_DATE_PATTERN};
use super::nexus::TreeFile;
use crate::{Error, Result};
use persist_types::ReferenceDate;
use regex::Regex;
use std::path::Path;

/// Regex locating the sampling date inside a tip name.
///
/// The first capture group is used when present, the whole match otherwise.
#[derive(Debug, Clone)]
pub struct TipDatePattern(Regex);

impl TipDatePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn extract<'t>(&self, name: &'t str) -> Option<&'t str> {
        let caps = self.0.captures(name)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }
}

impl Default for TipDatePattern {
    fn default() -> Self {
        Self(Regex::new(DEFAULT_TIP_DATE_PATTERN).expect("default tip date pattern is valid"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TipDate {
    pub name: String,
    pub decimal_year: f64,
}

/// Sampling dates of every tip whose name matches `pattern`.
pub fn tip_dates(file: &TreeFile, pattern: &TipDatePattern) -> Result<Vec<TipDate>> {
    let mut dates = Vec::new();
    for name in file.tip_names() {
        if let Some(text) = pattern.extract(&name) {
            let decimal_year = decimal_date(text)?;
            dates.push(TipDate { name, decimal_year });
        }
    }
    Ok(dates)
}

/// Most recent sampling date: the latest absolute time over all nodes once
/// the deepest tip is pinned to the latest tip date.
pub fn reference_date(file: &TreeFile, pattern: &TipDatePattern) -> Result<ReferenceDate> {
    let dates = tip_dates(file, pattern)?;
    let highest_tip = dates
        .iter()
        .map(|d| d.decimal_year)
        .reduce(f64::max)
        .ok_or_else(|| {
            Error::Tree(format!(
                "no tip name matches the date pattern {}",
                pattern.as_str()
            ))
        })?;

    let mrsd = file
        .tree
        .absolute_times(highest_tip)
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    ReferenceDate::new(mrsd).map_err(|e| Error::Tree(e.to_string()))
}

pub fn load_reference_date(path: &Path, pattern: &TipDatePattern) -> Result<ReferenceDate> {
    let file = TreeFile::load(path)?;
    reference_date(&file, pattern)
}

/// Fixed reference date given as a decimal year (`2022.08`) or a date (`2022-01-30`).
pub fn parse_reference_date(text: &str) -> Result<ReferenceDate> {
    let text = text.trim();
    let decimal = match text.parse::<f64>() {
        Ok(value) => value,
        Err(_) => decimal_date(text)?,
    };
    ReferenceDate::new(decimal).map_err(|e| Error::Date(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> TreeFile {
        TreeFile::parse(text).unwrap()
    }

    #[test]
    fn test_default_pattern_extracts_date() {
        let pattern = TipDatePattern::default();
        assert_eq!(pattern.extract("hCoV-19/Iraq/1|EPI_1|2021-05-01"), Some("2021-05-01"));
        assert_eq!(pattern.extract("no_date_here"), None);
    }

    #[test]
    fn test_pattern_without_group_uses_whole_match() {
        let pattern = TipDatePattern::new(r"\d{4}-\d{2}").unwrap();
        assert_eq!(pattern.extract("sample_2021-03"), Some("2021-03"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(TipDatePattern::new("(unclosed"), Err(Error::Regex(_))));
    }

    #[test]
    fn test_reference_date_is_latest_tip() {
        let file = tree("((a|2021-07-01:0.5,b|2022-01-01:1.0):0.5,c|2021-01-01:0.25);");
        let mrsd = reference_date(&file, &TipDatePattern::default()).unwrap();
        assert_eq!(mrsd.decimal_year(), 2022.0);
    }

    #[test]
    fn test_undated_tips_are_ignored() {
        let file = tree("(a|2020-01-01:1,outgroup:2);");
        let dates = tip_dates(&file, &TipDatePattern::default()).unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].name, "a|2020-01-01");
        assert_eq!(dates[0].decimal_year, 2020.0);
    }

    #[test]
    fn test_no_dated_tips_fails() {
        let file = tree("(a:1,b:2);");
        assert!(matches!(
            reference_date(&file, &TipDatePattern::default()),
            Err(Error::Tree(_))
        ));
    }

    #[test]
    fn test_parse_reference_date_forms() {
        assert_eq!(parse_reference_date("2022.5").unwrap().decimal_year(), 2022.5);
        assert_eq!(parse_reference_date("2022-01-01").unwrap().decimal_year(), 2022.0);
        assert!(parse_reference_date("later").is_err());
        assert!(parse_reference_date("NaN").is_err());
    }
}
