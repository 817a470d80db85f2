//! Trend analysis
//!
//! This module classifies a single metric's series as increasing,
//! decreasing, or stable using a split-half comparison: the mean of the
//! first half of the chronologically-sorted series against the mean of
//! the remainder.

use crate::series::SeriesPoint;
use crate::types::{TrendDirection, TrendResult};

/// Percent-change threshold separating stable from a real move.
/// A fixed design constant, not configurable per call.
pub const TREND_CHANGE_THRESHOLD_PCT: f64 = 5.0;

/// Analyzer classifying an ordered series into a [`TrendResult`]
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Classify a series already sorted ascending by timestamp.
    ///
    /// Zero points yields `no_data`, a single point `insufficient_data`.
    /// Otherwise the series splits into the first `n / 2` points and the
    /// remainder; the percent change between the half means drives the
    /// classification.
    pub fn analyze(series: &[SeriesPoint]) -> TrendResult {
        if series.is_empty() {
            return TrendResult::empty(TrendDirection::NoData);
        }
        if series.len() < 2 {
            return TrendResult::empty(TrendDirection::InsufficientData);
        }

        let (first, second) = series.split_at(series.len() / 2);
        let first_average = half_mean(first);
        let second_average = half_mean(second);

        let percent_change = if first_average > 0.0 {
            (second_average - first_average) / first_average * 100.0
        } else {
            0.0
        };

        let direction = if percent_change > TREND_CHANGE_THRESHOLD_PCT {
            TrendDirection::Increasing
        } else if percent_change < -TREND_CHANGE_THRESHOLD_PCT {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        TrendResult {
            direction,
            percent_change,
            first_period_average: first_average,
            second_period_average: second_average,
        }
    }
}

/// Mean over the half's extractable values. Records without a numeric
/// value are excluded, not counted as zero; a half with no numeric
/// values at all averages to 0.
fn half_mean(points: &[SeriesPoint]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for point in points {
        if let Some(value) = point.value {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn point(day: u32, value: Option<f64>) -> SeriesPoint {
        let timestamp: DateTime<Utc> = Utc.with_ymd_and_hms(2024, 5, day, 8, 0, 0).unwrap();
        SeriesPoint {
            timestamp,
            date: timestamp.date_naive(),
            value,
        }
    }

    fn series(values: &[f64]) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| point(i as u32 + 1, Some(*v)))
            .collect()
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let result = TrendAnalyzer::analyze(&[]);
        assert_eq!(result.direction, TrendDirection::NoData);
        assert_eq!(result.percent_change, 0.0);
    }

    #[test]
    fn test_single_point_is_insufficient_data() {
        let result = TrendAnalyzer::analyze(&series(&[7.0]));
        assert_eq!(result.direction, TrendDirection::InsufficientData);
        assert_eq!(result.percent_change, 0.0);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let result = TrendAnalyzer::analyze(&series(&[10.0, 10.0, 10.0, 10.0, 10.0, 10.0]));
        assert_eq!(result.direction, TrendDirection::Stable);
        assert_eq!(result.percent_change, 0.0);
        assert_eq!(result.first_period_average, 10.0);
        assert_eq!(result.second_period_average, 10.0);
    }

    #[test]
    fn test_doubling_series_is_increasing_100_pct() {
        let result = TrendAnalyzer::analyze(&series(&[4.0, 4.0, 4.0, 8.0, 8.0, 8.0]));
        assert_eq!(result.direction, TrendDirection::Increasing);
        assert_eq!(result.first_period_average, 4.0);
        assert_eq!(result.second_period_average, 8.0);
        assert!((result.percent_change - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_decreasing_series() {
        let result = TrendAnalyzer::analyze(&series(&[8.0, 8.0, 4.0, 4.0]));
        assert_eq!(result.direction, TrendDirection::Decreasing);
        assert!((result.percent_change + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_within_threshold_is_stable() {
        // 4% change sits inside the 5% band
        let result = TrendAnalyzer::analyze(&series(&[100.0, 100.0, 104.0, 104.0]));
        assert_eq!(result.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_odd_length_splits_floor_half() {
        // 5 points: first half is 2 points, second half 3
        let result = TrendAnalyzer::analyze(&series(&[2.0, 2.0, 6.0, 6.0, 6.0]));
        assert_eq!(result.first_period_average, 2.0);
        assert_eq!(result.second_period_average, 6.0);
        assert_eq!(result.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_zero_first_mean_yields_zero_percent_change() {
        let result = TrendAnalyzer::analyze(&series(&[0.0, 0.0, 5.0, 5.0]));
        assert_eq!(result.percent_change, 0.0);
        assert_eq!(result.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_missing_values_excluded_from_half_mean() {
        let points = vec![
            point(1, Some(4.0)),
            point(2, None),
            point(3, Some(8.0)),
            point(4, Some(8.0)),
        ];
        let result = TrendAnalyzer::analyze(&points);
        // First half mean is 4.0 (the None slot is excluded, not zero)
        assert_eq!(result.first_period_average, 4.0);
        assert_eq!(result.second_period_average, 8.0);
    }

    #[test]
    fn test_all_missing_half_averages_to_zero() {
        let points = vec![point(1, None), point(2, None), point(3, Some(5.0)), point(4, Some(5.0))];
        let result = TrendAnalyzer::analyze(&points);
        assert_eq!(result.first_period_average, 0.0);
        // Zero first mean suppresses percent change
        assert_eq!(result.percent_change, 0.0);
    }
}
