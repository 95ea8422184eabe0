//! Highest-density interval and median over per-tree samples.
//!
//! The interval is the narrowest window over the sorted sample that spans
//! `floor(probability * n)` steps. NaN sorts after every number and wins the
//! width comparison as soon as it appears, so a sample containing NaN yields
//! a NaN bound rather than silently dropping the value.

use crate::{Error, Result};
use persist_types::IntervalStats;
use std::cmp::Ordering;

/// Probability mass of the reported credible interval
pub const DEFAULT_HDI_PROB: f64 = 0.95;

/// Lower and upper bound of the highest-density interval of `values`.
pub fn estimate_interval(values: &[f64], probability: f64) -> Result<(f64, f64)> {
    check_probability(probability)?;
    if values.is_empty() {
        return Err(Error::EmptySample);
    }

    let sorted = sorted_nan_last(values);
    let n = sorted.len();
    let span = (probability * n as f64).floor() as usize;
    let windows = n - span;

    let mut best = 0;
    for start in 0..windows {
        let width = sorted[start + span] - sorted[start];
        if width.is_nan() {
            best = start;
            break;
        }
        if width < sorted[best + span] - sorted[best] {
            best = start;
        }
    }

    Ok((sorted[best], sorted[best + span]))
}

/// Sample median over the non-NaN values; NaN only if every value is NaN.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptySample);
    }

    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return Ok(f64::NAN);
    }

    let sorted = sorted_nan_last(&present);
    let n = sorted.len();
    if n % 2 == 0 {
        Ok((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Ok(sorted[n / 2])
    }
}

/// Interval bounds and median in one pass over the sample.
pub fn summarize(values: &[f64], probability: f64) -> Result<IntervalStats> {
    let (lower, upper) = estimate_interval(values, probability)?;
    let median = median(values)?;
    Ok(IntervalStats {
        lower,
        upper,
        median,
    })
}

pub fn check_probability(probability: f64) -> Result<()> {
    if probability > 0.0 && probability < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidProbability(probability))
    }
}

fn sorted_nan_last(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    });
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_sample_is_degenerate() {
        let stats = summarize(&[0.4; 7], DEFAULT_HDI_PROB).unwrap();
        assert_eq!(stats.lower, 0.4);
        assert_eq!(stats.upper, 0.4);
        assert_eq!(stats.median, 0.4);
    }

    #[test]
    fn test_single_value() {
        let stats = summarize(&[3.0], DEFAULT_HDI_PROB).unwrap();
        assert_eq!((stats.lower, stats.upper, stats.median), (3.0, 3.0, 3.0));
    }

    #[test]
    fn test_twenty_values_cover_full_range() {
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        assert_eq!(estimate_interval(&values, 0.95).unwrap(), (0.0, 19.0));
        assert_eq!(median(&values).unwrap(), 9.5);
    }

    #[test]
    fn test_interval_excludes_outlier() {
        // A percentile interval would reach towards 1000; the narrowest one does not
        let mut values: Vec<f64> = (1..40).map(f64::from).collect();
        values.push(1000.0);

        assert_eq!(estimate_interval(&values, 0.95).unwrap(), (1.0, 39.0));
        assert_eq!(median(&values).unwrap(), 20.5);
    }

    #[test]
    fn test_interval_prefers_dense_region() {
        let mut values = vec![0.0; 30];
        values.extend([1.0; 5]);
        values.extend([2.0, 3.0, 4.0, 5.0, 6.0, 100.0]);

        assert_eq!(estimate_interval(&values, 0.95).unwrap(), (0.0, 5.0));
        assert_eq!(median(&values).unwrap(), 0.0);
    }

    #[test]
    fn test_order_independent() {
        let a = [0.2, 0.9, 0.4, 0.6, 0.1, 0.75];
        let mut b = a;
        b.reverse();
        assert_eq!(summarize(&a, 0.95).unwrap(), summarize(&b, 0.95).unwrap());
    }

    #[test]
    fn test_input_not_mutated() {
        let values = vec![3.0, 1.0, 2.0];
        let _ = summarize(&values, 0.95).unwrap();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_median_within_interval() {
        let samples: [&[f64]; 4] = [
            &[1.0, 2.0],
            &[0.0, 0.0, 0.5, 1.0],
            &[5.0, 1.0, 4.0, 4.0, 9.0, 2.0, 2.0],
            &[0.1, 0.3, 0.3, 0.35, 0.9, 0.92, 0.95, 0.97, 1.0],
        ];
        for sample in samples {
            let stats = summarize(sample, 0.95).unwrap();
            assert!(stats.lower <= stats.median, "{:?}", sample);
            assert!(stats.median <= stats.upper, "{:?}", sample);
        }
    }

    #[test]
    fn test_nan_reaches_interval_but_not_median() {
        let values = [0.5, f64::NAN, 0.25, 1.0];
        let (lower, upper) = estimate_interval(&values, 0.95).unwrap();
        assert_eq!(lower, 0.25);
        assert!(upper.is_nan());
        assert_eq!(median(&values).unwrap(), 0.5);
    }

    #[test]
    fn test_all_nan_median_is_nan() {
        assert!(median(&[f64::NAN, f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_empty_sample_fails() {
        assert_eq!(estimate_interval(&[], 0.95), Err(Error::EmptySample));
        assert_eq!(median(&[]), Err(Error::EmptySample));
    }

    #[test]
    fn test_probability_bounds() {
        assert!(matches!(
            estimate_interval(&[1.0], 1.0),
            Err(Error::InvalidProbability(_))
        ));
        assert!(matches!(
            estimate_interval(&[1.0], 0.0),
            Err(Error::InvalidProbability(_))
        ));
        assert!(check_probability(0.5).is_ok());
    }
}
