//! Narrative boundary
//!
//! This module defines the contract toward the external natural-language
//! summarizer and the deterministic local fallback used when that
//! collaborator is unavailable or returns nothing usable. The fallback
//! converts the analyzer outputs into plain-language observations and
//! never raises an error toward the caller: the numeric analyzers do not
//! depend on the summarizer in any way.

use crate::error::AnalyticsError;
use crate::schema::Goal;
use crate::types::{
    CorrelationDirection, CorrelationStrength, HealthSummary, InsightReport, ProgressResult,
    TrendDirection,
};
use serde::{Deserialize, Serialize};

/// Correlations mentioned by the fallback, in rank order
const FALLBACK_CORRELATION_LIMIT: usize = 3;

/// Compact goal metadata forwarded to the summarizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalContext {
    pub title: String,
    pub category: String,
    pub target_value: f64,
    pub target_unit: String,
}

impl From<&Goal> for GoalContext {
    fn from(goal: &Goal) -> Self {
        GoalContext {
            title: goal.title.clone(),
            category: goal.category.clone(),
            target_value: goal.target_value,
            target_unit: goal.target_unit.clone(),
        }
    }
}

/// Serialized input for the external summarizer: the summary aggregate
/// plus goal metadata, compact enough to embed in a prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeRequest {
    pub summary: HealthSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<GoalContext>,
}

/// Where a narrative came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeSource {
    Provider,
    Fallback,
}

/// Structured insight/recommendation text for the end caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeResponse {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub source: NarrativeSource,
}

/// External LLM-style summarizer contract
pub trait NarrativeProvider {
    fn summarize(&self, request: &NarrativeRequest) -> Result<NarrativeResponse, AnalyticsError>;
}

/// Produce a narrative for a report, preferring the external provider.
///
/// Falls back to [`fallback_narrative`] when no provider is given, the
/// provider fails, or it returns an empty response. Total: never an error.
pub fn narrate(
    provider: Option<&dyn NarrativeProvider>,
    report: &InsightReport,
    progress: Option<&ProgressResult>,
    goal: Option<&Goal>,
) -> NarrativeResponse {
    if let Some(provider) = provider {
        let request = NarrativeRequest {
            summary: report.summary.clone(),
            goal: goal.map(GoalContext::from),
        };
        if let Ok(response) = provider.summarize(&request) {
            if !response.insights.is_empty() {
                return NarrativeResponse {
                    source: NarrativeSource::Provider,
                    ..response
                };
            }
        }
    }

    fallback_narrative(report, progress, goal)
}

/// Deterministic plain-language rendering of the analyzer outputs
pub fn fallback_narrative(
    report: &InsightReport,
    progress: Option<&ProgressResult>,
    goal: Option<&Goal>,
) -> NarrativeResponse {
    let mut insights = Vec::new();
    let mut recommendations = Vec::new();

    let summary = &report.summary;
    if summary.total_entries == 0 {
        insights.push("No health data recorded in this window yet.".to_string());
        recommendations
            .push("Start logging entries to unlock trends and correlations.".to_string());
        return NarrativeResponse {
            insights,
            recommendations,
            source: NarrativeSource::Fallback,
        };
    }

    match &summary.date_range {
        Some(range) => insights.push(format!(
            "Tracked {} entries across {} metric types between {} and {}.",
            summary.total_entries,
            summary.distinct_type_count,
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d"),
        )),
        None => insights.push(format!(
            "Tracked {} entries across {} metric types.",
            summary.total_entries, summary.distinct_type_count,
        )),
    }

    for (data_type, trend) in &report.trends {
        match trend.direction {
            TrendDirection::Increasing | TrendDirection::Decreasing => insights.push(format!(
                "Your {} readings have been {} ({:+.1}% over the window).",
                data_type.as_str(),
                trend.direction.as_str(),
                trend.percent_change,
            )),
            TrendDirection::Stable => insights.push(format!(
                "Your {} readings have held steady.",
                data_type.as_str(),
            )),
            TrendDirection::NoData | TrendDirection::InsufficientData => {}
        }
    }

    for correlation in report.correlations.iter().take(FALLBACK_CORRELATION_LIMIT) {
        let strength = match correlation.strength {
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::Moderate => "moderate",
        };
        let direction = match correlation.direction {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
        };
        insights.push(format!(
            "There is a {} {} relationship between {} and {} (r = {:.2} across {} shared days).",
            strength,
            direction,
            correlation.type_a.as_str(),
            correlation.type_b.as_str(),
            correlation.coefficient,
            correlation.sample_size,
        ));
    }

    if let Some(progress) = progress {
        let goal_name = goal.map(|g| g.title.as_str()).unwrap_or("your goal");
        insights.push(format!(
            "You logged data on {:.0}% of days since {} started ({:.1} entries per day on average).",
            progress.completion_percentage, goal_name, progress.average_entries_per_day,
        ));
        if progress.completion_percentage < 50.0 {
            recommendations.push(
                "Logging on more days will make your progress and trend numbers more reliable."
                    .to_string(),
            );
        }
    }

    if report.correlations.is_empty() && summary.distinct_type_count >= 2 {
        recommendations.push(
            "Keep logging overlapping days across your metrics so cross-metric patterns can surface."
                .to_string(),
        );
    }
    if summary.distinct_type_count < 2 {
        recommendations.push(
            "Track a second metric type to see how your metrics move together.".to_string(),
        );
    }

    NarrativeResponse {
        insights,
        recommendations,
        source: NarrativeSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::InsightEngine;
    use crate::schema::{DataType, Record};
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, 8, 0, 0).unwrap()
    }

    fn sample_report() -> InsightReport {
        let mut records = Vec::new();
        for (i, value) in [1.0, 2.0, 3.0, 4.0, 5.0].iter().enumerate() {
            records.push(Record::numeric(
                "user-1",
                DataType::Exercise,
                ts(i as u32 + 1),
                *value,
            ));
            records.push(Record::numeric(
                "user-1",
                DataType::Mood,
                ts(i as u32 + 1),
                *value * 2.0,
            ));
        }
        InsightEngine::with_instance_id("test".to_string()).analyze_at(&records, ts(6))
    }

    struct FailingProvider;
    impl NarrativeProvider for FailingProvider {
        fn summarize(&self, _: &NarrativeRequest) -> Result<NarrativeResponse, AnalyticsError> {
            Err(AnalyticsError::NarrativeProvider("timeout".to_string()))
        }
    }

    struct EchoProvider;
    impl NarrativeProvider for EchoProvider {
        fn summarize(
            &self,
            request: &NarrativeRequest,
        ) -> Result<NarrativeResponse, AnalyticsError> {
            Ok(NarrativeResponse {
                insights: vec![format!("{} entries reviewed", request.summary.total_entries)],
                recommendations: vec![],
                source: NarrativeSource::Provider,
            })
        }
    }

    struct EmptyProvider;
    impl NarrativeProvider for EmptyProvider {
        fn summarize(&self, _: &NarrativeRequest) -> Result<NarrativeResponse, AnalyticsError> {
            Ok(NarrativeResponse {
                insights: vec![],
                recommendations: vec![],
                source: NarrativeSource::Provider,
            })
        }
    }

    #[test]
    fn test_provider_response_passes_through() {
        let report = sample_report();
        let response = narrate(Some(&EchoProvider), &report, None, None);
        assert_eq!(response.source, NarrativeSource::Provider);
        assert_eq!(response.insights, vec!["10 entries reviewed".to_string()]);
    }

    #[test]
    fn test_provider_failure_falls_back() {
        let report = sample_report();
        let response = narrate(Some(&FailingProvider), &report, None, None);
        assert_eq!(response.source, NarrativeSource::Fallback);
        assert!(!response.insights.is_empty());
    }

    #[test]
    fn test_empty_provider_response_falls_back() {
        let report = sample_report();
        let response = narrate(Some(&EmptyProvider), &report, None, None);
        assert_eq!(response.source, NarrativeSource::Fallback);
    }

    #[test]
    fn test_fallback_mentions_trends_and_correlations() {
        let report = sample_report();
        let response = fallback_narrative(&report, None, None);

        let text = response.insights.join(" ");
        assert!(text.contains("exercise"));
        assert!(text.contains("mood"));
        assert!(text.contains("r = 1.00"));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let report = sample_report();
        let first = fallback_narrative(&report, None, None);
        let second = fallback_narrative(&report, None, None);
        assert_eq!(first.insights, second.insights);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn test_fallback_on_empty_report_never_errors() {
        let report = InsightEngine::with_instance_id("test".to_string()).analyze_at(&[], ts(1));
        let response = fallback_narrative(&report, None, None);
        assert_eq!(response.source, NarrativeSource::Fallback);
        assert!(!response.insights.is_empty());
        assert!(!response.recommendations.is_empty());
    }
}
