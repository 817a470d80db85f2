//! Record normalization
//!
//! This module extracts a single representative numeric value from a
//! heterogeneous record payload. Extraction is total: every payload yields
//! either a finite number or "no value", never an error. Centralizing it
//! here guarantees trend, correlation, and summary computations all see
//! the same number for a given record.

use crate::schema::{DataType, Record};
use serde_json::{Map, Value};

/// Field names probed on structured payloads, in priority order
pub const VALUE_FIELDS: [&str; 7] = [
    "value",
    "level",
    "duration",
    "quality",
    "severity",
    "systolic",
    "diastolic",
];

/// Normalizer for extracting numeric values from record payloads
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Extract the representative numeric value from a payload.
    ///
    /// A bare number is returned as-is. An object is probed for the known
    /// field names in order, then for a `<dataType>_data` wrapper object
    /// probed the same way. A present-but-non-numeric field is skipped,
    /// not coerced. `None` means "no numeric value" and callers must treat
    /// the record as an excluded data point, not a zero.
    pub fn extract(data_type: DataType, payload: &Value) -> Option<f64> {
        if let Some(number) = payload.as_f64() {
            return Some(number);
        }

        let object = payload.as_object()?;
        if let Some(number) = probe_fields(object) {
            return Some(number);
        }

        let wrapper_key = format!("{}_data", data_type.as_str());
        let wrapper = object.get(&wrapper_key)?.as_object()?;
        probe_fields(wrapper)
    }

    /// Extract the representative numeric value from a record
    pub fn extract_from(record: &Record) -> Option<f64> {
        Self::extract(record.data_type, &record.payload)
    }
}

/// Return the first known field holding a numeric value
fn probe_fields(object: &Map<String, Value>) -> Option<f64> {
    VALUE_FIELDS
        .iter()
        .find_map(|field| object.get(*field).and_then(Value::as_f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_numeric_payloads() {
        assert_eq!(RecordNormalizer::extract(DataType::Sleep, &json!(7.5)), Some(7.5));
        assert_eq!(RecordNormalizer::extract(DataType::Mood, &json!(4)), Some(4.0));
    }

    #[test]
    fn test_field_probe_order() {
        // "value" wins over "level" regardless of key position
        let payload = json!({"level": 3.0, "value": 9.0});
        assert_eq!(RecordNormalizer::extract(DataType::Stress, &payload), Some(9.0));

        let payload = json!({"duration": 45.0, "level": 3.0});
        assert_eq!(RecordNormalizer::extract(DataType::Stress, &payload), Some(3.0));
    }

    #[test]
    fn test_blood_pressure_systolic_before_diastolic() {
        let payload = json!({"systolic": 120.0, "diastolic": 80.0});
        assert_eq!(
            RecordNormalizer::extract(DataType::BloodPressure, &payload),
            Some(120.0)
        );
    }

    #[test]
    fn test_non_numeric_field_skipped_not_coerced() {
        // "value" is a string; the probe moves on to "level"
        let payload = json!({"value": "high", "level": 7.0});
        assert_eq!(RecordNormalizer::extract(DataType::Stress, &payload), Some(7.0));

        // Booleans are not numbers
        let payload = json!({"value": true});
        assert_eq!(RecordNormalizer::extract(DataType::Stress, &payload), None);
    }

    #[test]
    fn test_typed_data_wrapper() {
        let payload = json!({"sleep_data": {"duration": 420.0, "quality": 82.0}});
        assert_eq!(
            RecordNormalizer::extract(DataType::Sleep, &payload),
            Some(420.0)
        );

        // Wrapper key must match the record's data type
        assert_eq!(RecordNormalizer::extract(DataType::Mood, &payload), None);
    }

    #[test]
    fn test_top_level_field_wins_over_wrapper() {
        let payload = json!({"value": 5.0, "sleep_data": {"duration": 420.0}});
        assert_eq!(
            RecordNormalizer::extract(DataType::Sleep, &payload),
            Some(5.0)
        );
    }

    #[test]
    fn test_no_value_payloads() {
        assert_eq!(
            RecordNormalizer::extract(DataType::Symptoms, &json!({"notes": "mild"})),
            None
        );
        assert_eq!(RecordNormalizer::extract(DataType::Symptoms, &json!("bad")), None);
        assert_eq!(RecordNormalizer::extract(DataType::Symptoms, &json!(null)), None);
        assert_eq!(RecordNormalizer::extract(DataType::Symptoms, &json!({})), None);
    }
}
