//! Error types for Synheart Insight

use thiserror::Error;

/// Errors raised at the engine boundary.
///
/// The analytics computation itself is total: insufficient data is a
/// result state, not an error. These variants cover input that never
/// enters the engine (malformed batches, unscoped records) and failed
/// external collaborators.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse record batch: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Record is not scoped to a user")]
    MissingUserScope,

    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    #[error("Invalid payload shape: {0}")]
    InvalidPayload(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Narrative provider failed: {0}")]
    NarrativeProvider(String),
}
