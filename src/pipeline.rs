//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Insight. Inputs are
//! gathered by the caller first; the engine then runs as a synchronous,
//! pure computation over the in-memory batch: records are normalized and
//! grouped once, and the trend, correlation, and summary analyzers run
//! independently over that shared grouping. Goal progress is computed
//! separately from the goal's own records.

use crate::correlation::CorrelationAnalyzer;
use crate::error::AnalyticsError;
use crate::progress::GoalProgressCalculator;
use crate::schema::{DataType, Goal, Record};
use crate::series::SeriesBuilder;
use crate::summary::SummaryAggregator;
use crate::trend::TrendAnalyzer;
use crate::types::{InsightProducer, InsightReport, ProgressResult, TrendResult};
use crate::{INSIGHT_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "insight.report.v1";

/// Analyze a record collection with a fresh engine.
///
/// One-shot convenience; use [`InsightEngine`] to keep a stable instance
/// ID across reports.
pub fn analyze_records(records: &[Record]) -> InsightReport {
    InsightEngine::new().analyze(records)
}

/// Select the records counting toward a goal: matching `goal_id`, dated on
/// or after the goal's start.
///
/// The analyzers themselves assume pre-scoped input; this helper is for
/// callers holding an unfiltered batch.
pub fn records_for_goal(goal: &Goal, records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            record.goal_id.as_deref() == Some(goal.id.as_str())
                && record.timestamp >= goal.start_date
        })
        .cloned()
        .collect()
}

/// Analytics engine with a stable producer identity.
pub struct InsightEngine {
    instance_id: String,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an engine with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Compute the full report for a record collection (already scoped to
    /// one user and time window), stamped with the current time.
    pub fn analyze(&self, records: &[Record]) -> InsightReport {
        self.analyze_at(records, Utc::now())
    }

    /// Compute the full report with an explicit computation time.
    ///
    /// Re-running over an unchanged collection with the same `computed_at`
    /// yields a bit-identical report.
    pub fn analyze_at(&self, records: &[Record], computed_at: DateTime<Utc>) -> InsightReport {
        let series = SeriesBuilder::build(records);

        let trends: BTreeMap<DataType, TrendResult> = series
            .by_type
            .iter()
            .map(|(data_type, points)| (*data_type, TrendAnalyzer::analyze(points)))
            .collect();

        let correlations = CorrelationAnalyzer::analyze(&series);
        let summary = SummaryAggregator::aggregate(records);

        InsightReport {
            report_version: REPORT_VERSION.to_string(),
            producer: InsightProducer {
                name: PRODUCER_NAME.to_string(),
                version: INSIGHT_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: computed_at.to_rfc3339(),
            summary,
            trends,
            correlations,
        }
    }

    /// Serialize a full report to JSON
    pub fn analyze_to_json(&self, records: &[Record]) -> Result<String, AnalyticsError> {
        let report = self.analyze(records);
        serde_json::to_string_pretty(&report).map_err(AnalyticsError::JsonError)
    }

    /// Score a goal from its associated records
    pub fn goal_progress(
        &self,
        goal: &Goal,
        records: &[Record],
        now: DateTime<Utc>,
    ) -> ProgressResult {
        GoalProgressCalculator::calculate(goal, records, now)
    }
}
