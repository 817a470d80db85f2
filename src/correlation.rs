//! Correlation analysis
//!
//! This module computes pairwise Pearson correlation between every pair of
//! distinct metric types observed in a window, aligned on the calendar
//! days where both have a representative value, then filters and ranks
//! the results.
//!
//! The sample floor and coefficient cutoffs are deliberate noise filters
//! for small personal datasets, documented as heuristics rather than
//! p-value-backed significance.

use crate::schema::DataType;
use crate::series::SeriesSet;
use crate::types::{Correlation, CorrelationDirection, CorrelationStrength};
use std::cmp::Ordering;

/// Minimum shared days before a pair is worth a coefficient
/// (`sample_size > 3`)
pub const MIN_SAMPLE_SIZE: usize = 4;

/// Coefficients at or below this magnitude are treated as noise
pub const SIGNIFICANCE_FLOOR: f64 = 0.3;

/// Magnitude above which a correlation is classified as strong
pub const STRONG_THRESHOLD: f64 = 0.7;

/// Analyzer producing a ranked list of significant correlations
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Compute significant pairwise correlations over a day-aligned
    /// series set.
    ///
    /// Pairs with fewer than [`MIN_SAMPLE_SIZE`] overlapping days are
    /// skipped entirely, as are coefficients inside the significance
    /// floor. The result is sorted descending by coefficient magnitude,
    /// with ties broken by type-pair name so repeated runs produce an
    /// identical list.
    pub fn analyze(series: &SeriesSet) -> Vec<Correlation> {
        let types = series.numeric_types();
        let mut correlations = Vec::new();

        for (i, &type_a) in types.iter().enumerate() {
            for &type_b in &types[i + 1..] {
                if let Some(correlation) = Self::analyze_pair(series, type_a, type_b) {
                    correlations.push(correlation);
                }
            }
        }

        correlations.sort_by(|left, right| {
            right
                .coefficient
                .abs()
                .partial_cmp(&left.coefficient.abs())
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    (left.type_a.as_str(), left.type_b.as_str())
                        .cmp(&(right.type_a.as_str(), right.type_b.as_str()))
                })
        });

        for correlation in &mut correlations {
            correlation.coefficient = round2(correlation.coefficient);
        }

        correlations
    }

    /// Correlate one unordered type pair, if it clears the filters
    pub fn analyze_pair(
        series: &SeriesSet,
        type_a: DataType,
        type_b: DataType,
    ) -> Option<Correlation> {
        let (values_a, values_b) = aligned_values(series, type_a, type_b);
        if values_a.len() < MIN_SAMPLE_SIZE {
            return None;
        }

        let coefficient = pearson(&values_a, &values_b);
        if coefficient.abs() <= SIGNIFICANCE_FLOOR {
            return None;
        }

        Some(Correlation {
            type_a,
            type_b,
            coefficient,
            strength: classify_strength(coefficient),
            direction: classify_direction(coefficient),
            sample_size: values_a.len(),
        })
    }
}

/// Collect both types' representative values over the days where both
/// are present, in day order
pub fn aligned_values(
    series: &SeriesSet,
    type_a: DataType,
    type_b: DataType,
) -> (Vec<f64>, Vec<f64>) {
    let mut values_a = Vec::new();
    let mut values_b = Vec::new();

    for day in series.by_day.values() {
        if let (Some(&a), Some(&b)) = (day.get(&type_a), day.get(&type_b)) {
            values_a.push(a);
            values_b.push(b);
        }
    }

    (values_a, values_b)
}

/// Pearson product-moment correlation coefficient over two aligned
/// vectors of equal length.
///
/// `r = (n*Σxy - Σx*Σy) / sqrt((n*Σx² - (Σx)²)(n*Σy² - (Σy)²))`,
/// with `r = 0` defined when either series has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len() as f64;
    if xs.is_empty() {
        return 0.0;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;

    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        sum_yy += y * y;
    }

    let variance_x = n * sum_xx - sum_x * sum_x;
    let variance_y = n * sum_yy - sum_y * sum_y;
    if variance_x <= 0.0 || variance_y <= 0.0 {
        return 0.0;
    }

    (n * sum_xy - sum_x * sum_y) / (variance_x * variance_y).sqrt()
}

/// Classify coefficient magnitude into strength
pub fn classify_strength(coefficient: f64) -> CorrelationStrength {
    if coefficient.abs() > STRONG_THRESHOLD {
        CorrelationStrength::Strong
    } else {
        CorrelationStrength::Moderate
    }
}

/// Classify coefficient sign into direction
pub fn classify_direction(coefficient: f64) -> CorrelationDirection {
    if coefficient > 0.0 {
        CorrelationDirection::Positive
    } else {
        CorrelationDirection::Negative
    }
}

/// Round to 2 decimal places for output
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
