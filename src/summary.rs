//! Summary aggregation
//!
//! This module rolls a record collection up into per-type counts, averages,
//! and latest values plus the overall date range. The result stands on its
//! own for dashboards and doubles as the compact input serialized for the
//! narrative summarizer.

use crate::normalizer::RecordNormalizer;
use crate::schema::{DataType, Record};
use crate::types::{DateRange, HealthSummary, TypeSummary};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TypeAccumulator {
    count: usize,
    numeric_count: usize,
    sum: f64,
    latest: Option<(DateTime<Utc>, serde_json::Value)>,
}

/// Aggregator producing a [`HealthSummary`] from a record collection
pub struct SummaryAggregator;

impl SummaryAggregator {
    /// Aggregate per-type counts, averages, and latest values.
    ///
    /// Averages use only records whose payload yields a numeric value; a
    /// type with none has `average = 0` by convention, which callers must
    /// not read as a real measurement. The latest value is the most recent
    /// record's payload verbatim, not normalized.
    pub fn aggregate(records: &[Record]) -> HealthSummary {
        let mut accumulators: BTreeMap<DataType, TypeAccumulator> = BTreeMap::new();
        let mut range: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

        for record in records {
            let accumulator = accumulators.entry(record.data_type).or_default();
            accumulator.count += 1;

            if let Some(value) = RecordNormalizer::extract_from(record) {
                accumulator.sum += value;
                accumulator.numeric_count += 1;
            }

            let is_newer = accumulator
                .latest
                .as_ref()
                .map(|(latest, _)| record.timestamp > *latest)
                .unwrap_or(true);
            if is_newer {
                accumulator.latest = Some((record.timestamp, record.payload.clone()));
            }

            range = Some(match range {
                None => (record.timestamp, record.timestamp),
                Some((start, end)) => (start.min(record.timestamp), end.max(record.timestamp)),
            });
        }

        let types: BTreeMap<DataType, TypeSummary> = accumulators
            .into_iter()
            .map(|(data_type, accumulator)| {
                let average = if accumulator.numeric_count > 0 {
                    accumulator.sum / accumulator.numeric_count as f64
                } else {
                    0.0
                };
                let latest_value = accumulator
                    .latest
                    .map(|(_, payload)| payload)
                    .unwrap_or(serde_json::Value::Null);
                (
                    data_type,
                    TypeSummary {
                        count: accumulator.count,
                        average,
                        latest_value,
                    },
                )
            })
            .collect();

        HealthSummary {
            distinct_type_count: types.len(),
            total_entries: records.len(),
            types,
            date_range: range.map(|(start, end)| DateRange { start, end }),
        }
    }
}
