//! Output types for the Synheart Insight engine
//!
//! This module defines the derived entities the analyzers produce: trend
//! classifications, ranked correlations, goal progress, per-type summaries,
//! and the report envelope handed to dashboards and the narrative
//! summarizer. Field names are the stable contract toward presentation
//! layers and must not change.

use crate::schema::DataType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coarse trend classification for one metric's series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    NoData,
    InsufficientData,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
            TrendDirection::NoData => "no_data",
            TrendDirection::InsufficientData => "insufficient_data",
        }
    }
}

/// Split-half trend result for one data type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub direction: TrendDirection,
    /// Change of the second-half mean relative to the first-half mean
    pub percent_change: f64,
    pub first_period_average: f64,
    pub second_period_average: f64,
}

impl TrendResult {
    /// Result carrying only a direction (no_data / insufficient_data)
    pub fn empty(direction: TrendDirection) -> Self {
        TrendResult {
            direction,
            percent_change: 0.0,
            first_period_average: 0.0,
            second_period_average: 0.0,
        }
    }
}

/// Correlation strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
}

/// Correlation sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

/// Pearson correlation between two metric types on their shared days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub type_a: DataType,
    pub type_b: DataType,
    /// Pearson coefficient in [-1, 1], rounded to 2 decimal places
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    /// Number of days on which both types had a representative value
    pub sample_size: usize,
}

/// Goal completion and logging-consistency percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResult {
    /// Share of elapsed days with at least one record, capped at 100
    pub completion_percentage: f64,
    /// Currently the same ratio as `completion_percentage`; kept as a
    /// separate field so the contract can diverge without breaking
    /// consumers
    pub consistency_percentage: f64,
    pub total_entries: usize,
    pub average_entries_per_day: f64,
}

/// Per-type aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummary {
    pub count: usize,
    /// Mean over records with an extractable numeric value; 0 by
    /// convention when no record of the type yields one
    pub average: f64,
    /// Payload of the most recent record by timestamp, verbatim
    pub latest_value: serde_json::Value,
}

/// Observation window covered by a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Aggregate view over a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub types: BTreeMap<DataType, TypeSummary>,
    pub total_entries: usize,
    pub distinct_type_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete analytics report: the serializable envelope consumed by
/// dashboards and by the narrative summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub report_version: String,
    pub producer: InsightProducer,
    pub computed_at_utc: String,
    pub summary: HealthSummary,
    pub trends: BTreeMap<DataType, TrendResult>,
    pub correlations: Vec<Correlation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_direction_wire_names() {
        assert_eq!(
            serde_json::to_value(TrendDirection::NoData).unwrap(),
            "no_data"
        );
        assert_eq!(
            serde_json::to_value(TrendDirection::InsufficientData).unwrap(),
            "insufficient_data"
        );
    }

    #[test]
    fn test_trend_result_field_names() {
        let result = TrendResult {
            direction: TrendDirection::Increasing,
            percent_change: 12.5,
            first_period_average: 4.0,
            second_period_average: 4.5,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["direction"], "increasing");
        assert_eq!(json["percentChange"], 12.5);
        assert_eq!(json["firstPeriodAverage"], 4.0);
        assert_eq!(json["secondPeriodAverage"], 4.5);
    }

    #[test]
    fn test_correlation_field_names() {
        let correlation = Correlation {
            type_a: DataType::Exercise,
            type_b: DataType::Mood,
            coefficient: 0.85,
            strength: CorrelationStrength::Strong,
            direction: CorrelationDirection::Positive,
            sample_size: 12,
        };
        let json = serde_json::to_value(&correlation).unwrap();
        assert_eq!(json["typeA"], "exercise");
        assert_eq!(json["typeB"], "mood");
        assert_eq!(json["coefficient"], 0.85);
        assert_eq!(json["strength"], "strong");
        assert_eq!(json["direction"], "positive");
        assert_eq!(json["sampleSize"], 12);
    }

    #[test]
    fn test_progress_result_field_names() {
        let progress = ProgressResult {
            completion_percentage: 50.0,
            consistency_percentage: 50.0,
            total_entries: 10,
            average_entries_per_day: 1.0,
        };
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["completionPercentage"], 50.0);
        assert_eq!(json["consistencyPercentage"], 50.0);
        assert_eq!(json["totalEntries"], 10);
        assert_eq!(json["averageEntriesPerDay"], 1.0);
    }

    #[test]
    fn test_summary_types_keyed_by_wire_name() {
        let mut types = BTreeMap::new();
        types.insert(
            DataType::BloodPressure,
            TypeSummary {
                count: 1,
                average: 120.0,
                latest_value: serde_json::json!({"systolic": 120}),
            },
        );
        let summary = HealthSummary {
            types,
            total_entries: 1,
            distinct_type_count: 1,
            date_range: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["types"]["blood_pressure"].is_object());
        assert!(json.get("dateRange").is_none());
    }
}
