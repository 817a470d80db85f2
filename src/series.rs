//! Series building
//!
//! This module groups normalized records into the two shapes the analyzers
//! consume:
//! - per-type series, ascending by timestamp, one point per record
//! - a day-aligned map (calendar day -> type -> representative value) for
//!   cross-type correlation
//!
//! Calendar-day keys use the UTC date portion of the record timestamp so
//! trend and correlation results stay reproducible across components.

use crate::normalizer::RecordNormalizer;
use crate::schema::{DataType, Record};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// One record's contribution to a per-type series.
///
/// `value` is `None` when the payload yields no numeric value; the slot is
/// kept so trend half-means can exclude it rather than treat it as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    /// UTC calendar day of the observation
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Grouped view over a record collection
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    /// Per-type series, ascending by timestamp within each type
    pub by_type: BTreeMap<DataType, Vec<SeriesPoint>>,
    /// Calendar day -> type -> representative numeric value
    pub by_day: BTreeMap<NaiveDate, BTreeMap<DataType, f64>>,
}

impl SeriesSet {
    /// Distinct data types with at least one representative numeric value
    pub fn numeric_types(&self) -> Vec<DataType> {
        let mut types: Vec<DataType> = self
            .by_day
            .values()
            .flat_map(|day| day.keys().copied())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Builder grouping records into a [`SeriesSet`]
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Group a record collection (already scoped to one user and time
    /// window) by data type and by calendar day.
    ///
    /// The first extracted value for a (day, type) cell wins as the
    /// representative value; ties on timestamp keep input order.
    pub fn build(records: &[Record]) -> SeriesSet {
        let mut by_type: BTreeMap<DataType, Vec<SeriesPoint>> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, BTreeMap<DataType, f64>> = BTreeMap::new();

        for record in records {
            let value = RecordNormalizer::extract_from(record);
            let date = record.timestamp.date_naive();

            by_type
                .entry(record.data_type)
                .or_default()
                .push(SeriesPoint {
                    timestamp: record.timestamp,
                    date,
                    value,
                });

            if let Some(value) = value {
                by_day
                    .entry(date)
                    .or_default()
                    .entry(record.data_type)
                    .or_insert(value);
            }
        }

        // Stable sort: records on the same instant keep input order
        for series in by_type.values_mut() {
            series.sort_by_key(|point| point.timestamp);
        }

        SeriesSet { by_type, by_day }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn numeric(data_type: DataType, timestamp: DateTime<Utc>, value: f64) -> Record {
        Record::numeric("user-1", data_type, timestamp, value)
    }

    #[test]
    fn test_groups_by_type_sorted_by_timestamp() {
        let records = vec![
            numeric(DataType::Sleep, ts(3, 8), 6.0),
            numeric(DataType::Mood, ts(1, 9), 4.0),
            numeric(DataType::Sleep, ts(1, 8), 7.0),
            numeric(DataType::Sleep, ts(2, 8), 8.0),
        ];

        let set = SeriesBuilder::build(&records);
        assert_eq!(set.by_type.len(), 2);

        let sleep = &set.by_type[&DataType::Sleep];
        let values: Vec<f64> = sleep.iter().filter_map(|p| p.value).collect();
        assert_eq!(values, vec![7.0, 8.0, 6.0]);
    }

    #[test]
    fn test_day_key_is_utc_date_portion() {
        // 23:30 UTC on the 1st and 00:30 UTC on the 2nd are different days
        let records = vec![
            numeric(DataType::Sleep, Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap(), 6.0),
            numeric(DataType::Sleep, Utc.with_ymd_and_hms(2024, 3, 2, 0, 30, 0).unwrap(), 7.0),
        ];

        let set = SeriesBuilder::build(&records);
        assert_eq!(set.by_day.len(), 2);
    }

    #[test]
    fn test_representative_value_is_first_in_input_order() {
        let records = vec![
            numeric(DataType::Stress, ts(1, 14), 5.0),
            numeric(DataType::Stress, ts(1, 9), 8.0),
        ];

        let set = SeriesBuilder::build(&records);
        // First occurrence in input order wins, even if a later input
        // record has an earlier timestamp
        assert_eq!(set.by_day[&ts(1, 0).date_naive()][&DataType::Stress], 5.0);
    }

    #[test]
    fn test_non_numeric_record_keeps_series_slot_but_no_day_value() {
        let records = vec![
            Record::structured("user-1", DataType::Symptoms, ts(1, 8), json!({"notes": "mild"})),
            numeric(DataType::Symptoms, ts(2, 8), 2.0),
        ];

        let set = SeriesBuilder::build(&records);
        let series = &set.by_type[&DataType::Symptoms];
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].value, None);
        assert_eq!(series[1].value, Some(2.0));

        // Day 1 has no representative value for symptoms
        assert!(!set.by_day.contains_key(&ts(1, 0).date_naive()));
        assert_eq!(set.numeric_types(), vec![DataType::Symptoms]);
    }

    #[test]
    fn test_empty_input() {
        let set = SeriesBuilder::build(&[]);
        assert!(set.is_empty());
        assert!(set.numeric_types().is_empty());
    }
}
