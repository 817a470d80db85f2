//! Synheart Insight - On-device analytics engine for personal health time-series
//!
//! Insight turns irregular, heterogeneously-shaped health records into
//! dashboard-ready analytics through a deterministic pipeline: record
//! normalization → series building → {trend classification, pairwise
//! correlation, summary aggregation}, plus goal progress scoring over a
//! goal's own records.
//!
//! The engine is a pure function of the records and goals handed to it: it
//! performs no I/O, reaches for no ambient state, and degrades to
//! data-carrying result states (`no_data`, an absent correlation pair)
//! instead of raising errors.

pub mod correlation;
pub mod error;
pub mod narrative;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod schema;
pub mod series;
pub mod summary;
pub mod trend;
pub mod types;

pub use error::AnalyticsError;
pub use narrative::{fallback_narrative, narrate, NarrativeProvider, NarrativeRequest, NarrativeResponse};
pub use pipeline::{analyze_records, records_for_goal, InsightEngine, REPORT_VERSION};

// Schema exports
pub use schema::{DataType, Goal, GoalStatus, Record, RecordAdapter, SCHEMA_VERSION};

// Output type exports
pub use types::{
    Correlation, HealthSummary, InsightReport, ProgressResult, TrendDirection, TrendResult,
};

/// Insight version embedded in all report payloads
pub const INSIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "synheart-insight";
