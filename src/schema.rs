//! health.record.v1 schema definition
//!
//! The input boundary of the engine: timestamped health observations and
//! the goals they track against. Records arrive with heterogeneous payload
//! shapes (bare numbers, structured objects, `<type>_data` wrappers);
//! validation rejects contract violations here so the analytics code never
//! sees unscoped or malformed input.

use crate::error::AnalyticsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: &str = "health.record.v1";

/// Health metric categories
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Sleep,
    Stress,
    Nutrition,
    Exercise,
    Headache,
    Weather,
    BloodPressure,
    Mood,
    Hydration,
    Medication,
    Symptoms,
    Vitals,
    Custom,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Sleep => "sleep",
            DataType::Stress => "stress",
            DataType::Nutrition => "nutrition",
            DataType::Exercise => "exercise",
            DataType::Headache => "headache",
            DataType::Weather => "weather",
            DataType::BloodPressure => "blood_pressure",
            DataType::Mood => "mood",
            DataType::Hydration => "hydration",
            DataType::Medication => "medication",
            DataType::Symptoms => "symptoms",
            DataType::Vitals => "vitals",
            DataType::Custom => "custom",
        }
    }
}

/// A single timestamped health observation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Schema version identifier, if the producer stamps one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Unique record identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Owning user (opaque identifier)
    pub user_id: String,
    /// Goal this observation counts toward, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    /// Metric category
    pub data_type: DataType,
    /// Point in time the observation pertains to (not insertion time)
    pub timestamp: DateTime<Utc>,
    /// Observation payload: a bare number or a structured object whose
    /// numeric signal lives under a known field name
    pub payload: serde_json::Value,
}

impl Record {
    /// Create a record with a bare numeric payload
    pub fn numeric(
        user_id: impl Into<String>,
        data_type: DataType,
        timestamp: DateTime<Utc>,
        value: f64,
    ) -> Self {
        Record {
            schema_version: Some(SCHEMA_VERSION.to_string()),
            record_id: Some(uuid::Uuid::new_v4().to_string()),
            user_id: user_id.into(),
            goal_id: None,
            data_type,
            timestamp,
            payload: serde_json::Value::from(value),
        }
    }

    /// Create a record with a structured payload
    pub fn structured(
        user_id: impl Into<String>,
        data_type: DataType,
        timestamp: DateTime<Utc>,
        payload: serde_json::Value,
    ) -> Self {
        Record {
            schema_version: Some(SCHEMA_VERSION.to_string()),
            record_id: Some(uuid::Uuid::new_v4().to_string()),
            user_id: user_id.into(),
            goal_id: None,
            data_type,
            timestamp,
            payload,
        }
    }

    /// Attach a goal ID
    pub fn with_goal_id(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    /// Validate the record against the input contract.
    ///
    /// Rejected: empty user scope, foreign schema versions, and payload
    /// shapes that are neither a number nor an object. A payload with no
    /// extractable numeric value is still valid; the normalizer reports
    /// it as "no value" downstream.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.user_id.trim().is_empty() {
            return Err(AnalyticsError::MissingUserScope);
        }
        if let Some(version) = &self.schema_version {
            if version != SCHEMA_VERSION {
                return Err(AnalyticsError::UnsupportedSchemaVersion(version.clone()));
            }
        }
        if !self.payload.is_number() && !self.payload.is_object() {
            return Err(AnalyticsError::InvalidPayload(format!(
                "expected number or object, got {}",
                value_kind(&self.payload)
            )));
        }
        Ok(())
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Goal status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    /// For other states (paused, abandoned, ...)
    #[serde(untagged)]
    Other(String),
}

/// A user-defined tracked target with a time window and category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub category: String,
    pub target_value: f64,
    pub target_unit: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub status: GoalStatus,
}

/// One invalid record found during batch validation
#[derive(Debug, Clone, Serialize)]
pub struct RecordValidationIssue {
    /// Position of the record in the input batch
    pub index: usize,
    pub record_id: Option<String>,
    pub error: String,
}

/// Adapter for parsing and validating record batches
pub struct RecordAdapter;

impl RecordAdapter {
    /// Parse newline-delimited JSON (one record per line)
    pub fn parse_ndjson(input: &str) -> Result<Vec<Record>, AnalyticsError> {
        let mut records = Vec::new();
        for (line_no, line) in input.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let record: Record = serde_json::from_str(trimmed).map_err(|e| {
                AnalyticsError::ParseError(format!("line {}: {}", line_no + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Parse a JSON array of records
    pub fn parse_array(input: &str) -> Result<Vec<Record>, AnalyticsError> {
        let records: Vec<Record> = serde_json::from_str(input)?;
        Ok(records)
    }

    /// Validate every record in a batch, reporting each failure
    pub fn validate_records(records: &[Record]) -> Vec<RecordValidationIssue> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                record.validate().err().map(|e| RecordValidationIssue {
                    index,
                    record_id: record.record_id.clone(),
                    error: e.to_string(),
                })
            })
            .collect()
    }
}
