//! Summary statistics for numeric columns
//!
//! Mirrors the usual tabular "describe" output:
//! - Count and missing (NaN / infinite) values
//! - Mean and standard deviation
//! - Min, quartiles, max

use serde::{Deserialize, Serialize};

/// Summary statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Number of finite values
    pub count: usize,
    /// Number of missing (non-finite) values
    pub missing: usize,
    /// Mean
    pub mean: f64,
    /// Population standard deviation (divides by n)
    pub std_dev: f64,
    /// Sample standard deviation (divides by n - 1)
    pub sample_std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// 25th percentile
    pub q1: f64,
    /// 50th percentile
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Maximum value
    pub max: f64,
}

impl ColumnSummary {
    /// Compute summary statistics, skipping non-finite values
    pub fn from_values(data: &[f64]) -> Self {
        let mut finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = data.len() - finite.len();

        if finite.is_empty() {
            return Self::empty(missing);
        }

        finite.sort_by(f64::total_cmp);

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let sum_sq: f64 = finite.iter().map(|x| (x - mean).powi(2)).sum();
        let std_dev = (sum_sq / count as f64).sqrt();
        let sample_std_dev = if count > 1 {
            (sum_sq / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count,
            missing,
            mean,
            std_dev,
            sample_std_dev,
            min: finite[0],
            q1: quantile_sorted(&finite, 0.25),
            median: quantile_sorted(&finite, 0.5),
            q3: quantile_sorted(&finite, 0.75),
            max: finite[count - 1],
        }
    }

    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            mean: f64::NAN,
            std_dev: f64::NAN,
            sample_std_dev: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Get the interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether any value was missing
    pub fn has_missing(&self) -> bool {
        self.missing > 0
    }
}

/// Quantile of already-sorted data using linear interpolation
///
/// `p` is clamped to [0, 1]. Returns NaN for empty input.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_summary_basic() {
        let data = vec![10.0, 30.0, 60.0];
        let summary = ColumnSummary::from_values(&data);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.missing, 0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 60.0);
        assert_eq!(summary.median, 30.0);
        assert!((summary.mean - 100.0 / 3.0).abs() < 1e-10);
        assert_eq!(summary.range(), 50.0);
    }

    #[test]
    fn test_summary_quartiles_interpolate() {
        let data: Vec<f64> = (1..=4).map(|x| x as f64).collect();
        let summary = ColumnSummary::from_values(&data);

        assert!((summary.q1 - 1.75).abs() < 1e-10);
        assert!((summary.median - 2.5).abs() < 1e-10);
        assert!((summary.q3 - 3.25).abs() < 1e-10);
        assert!((summary.iqr() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_summary_std_dev() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = ColumnSummary::from_values(&data);

        assert!((summary.std_dev - 2.0).abs() < 1e-10);
        assert!((summary.sample_std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_summary_with_nan() {
        let data = vec![1.0, f64::NAN, 3.0, f64::INFINITY];
        let summary = ColumnSummary::from_values(&data);

        assert_eq!(summary.count, 2);
        assert_eq!(summary.missing, 2);
        assert!(summary.has_missing());
        assert_eq!(summary.max, 3.0);
    }

    #[test]
    fn test_summary_empty() {
        let summary = ColumnSummary::from_values(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_single_value_sample_std_is_nan() {
        let summary = ColumnSummary::from_values(&[42.0]);
        assert_eq!(summary.std_dev, 0.0);
        assert!(summary.sample_std_dev.is_nan());
        assert_eq!(summary.q1, 42.0);
    }

    proptest! {
        #[test]
        fn test_quartiles_are_ordered(data in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let s = ColumnSummary::from_values(&data);
            prop_assert!(s.min <= s.q1);
            prop_assert!(s.q1 <= s.median);
            prop_assert!(s.median <= s.q3);
            prop_assert!(s.q3 <= s.max);
        }
    }
}
