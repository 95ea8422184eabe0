use crate::{Error, Result};
use chrono::{Datelike, NaiveDate, TimeDelta};

/// Sampling date embedded in tip names, e.g. `hCoV-19/Iraq/123|2021-05-01`
pub const DEFAULT_TIP_DATE_PATTERN: &str = r"\|([0-9]+\-[0-9]+\-[0-9]+)";

/// Convert `YYYY`, `YYYY-MM` or `YYYY-MM-DD` into a decimal year.
///
/// Missing month/day default to the first, so precision follows the text.
pub fn decimal_date(text: &str) -> Result<f64> {
    let invalid = || Error::Date(format!("invalid date {:?}", text));

    let parts: Vec<&str> = text.trim().split('-').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }
    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = match parts.get(1) {
        Some(m) => m.parse().map_err(|_| invalid())?,
        None => 1,
    };
    let day: u32 = match parts.get(2) {
        Some(d) => d.parse().map_err(|_| invalid())?,
        None => 1,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
    let (start, end) = year_bounds(year).ok_or_else(invalid)?;

    let elapsed = (date - start).num_seconds() as f64;
    let length = (end - start).num_seconds() as f64;
    Ok(f64::from(year) + elapsed / length)
}

/// Convert a decimal year back to `YYYY-MM-DD`.
pub fn calendar_date(decimal_year: f64) -> Result<String> {
    let out_of_range = || Error::Date(format!("decimal year {} out of range", decimal_year));
    if !decimal_year.is_finite() {
        return Err(out_of_range());
    }

    let year = decimal_year.trunc();
    if year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return Err(out_of_range());
    }
    let year = year as i32;
    let (start, end) = year_bounds(year).ok_or_else(out_of_range)?;

    let length = (end - start).num_seconds() as f64;
    let seconds = ((decimal_year - f64::from(year)) * length).round() as i64;
    let start = start.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?;
    let offset = TimeDelta::try_seconds(seconds).ok_or_else(out_of_range)?;
    let moment = start.checked_add_signed(offset).ok_or_else(out_of_range)?;

    Ok(format!(
        "{:04}-{:02}-{:02}",
        moment.year(),
        moment.month(),
        moment.day()
    ))
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?,
    ))
}
