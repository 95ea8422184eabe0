use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Finite time coordinate usable as a grouping key.
///
/// Raw input times and calendar-converted times both live in this type.
/// Equality and ordering follow `f64::total_cmp`, so identical values
/// parsed from the same text always land in the same group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeValue(f64);

impl TimeValue {
    pub fn new(field: &'static str, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::NonFiniteTime { field, value });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Midpoint of two time values
    pub fn midpoint(self, other: TimeValue) -> TimeValue {
        TimeValue((self.0 + other.0) / 2.0)
    }
}

impl PartialEq for TimeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeValue {}

impl PartialOrd for TimeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        // -0.0 and 0.0 must group together
        let a = if self.0 == 0.0 { 0.0 } else { self.0 };
        let b = if other.0 == 0.0 { 0.0 } else { other.0 };
        a.total_cmp(&b)
    }
}

impl Hash for TimeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let v = if self.0 == 0.0 { 0.0 } else { self.0 };
        v.to_bits().hash(state);
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Most recent sampling date (mrsd) in decimal years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceDate(f64);

impl ReferenceDate {
    pub fn new(decimal_year: f64) -> Result<Self> {
        if !decimal_year.is_finite() {
            return Err(Error::NonFiniteTime {
                field: "mrsd",
                value: decimal_year,
            });
        }
        Ok(Self(decimal_year))
    }

    pub fn decimal_year(self) -> f64 {
        self.0
    }

    /// Convert a time-before-reference value into a calendar value (`mrsd - raw`)
    pub fn to_calendar(self, raw: TimeValue) -> TimeValue {
        TimeValue(self.0 - raw.0)
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
