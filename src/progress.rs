//! Goal progress scoring
//!
//! This module computes completion and logging-consistency percentages for
//! a goal from the records associated with it. Callers supply `now`
//! explicitly so the computation stays a pure function of its inputs.

use crate::schema::{Goal, Record};
use crate::types::ProgressResult;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Calculator for goal completion and consistency
pub struct GoalProgressCalculator;

impl GoalProgressCalculator {
    /// Score a goal from its associated records (already filtered to the
    /// goal and to dates on or after its start).
    ///
    /// Elapsed days are rounded up and floored at 1, so a goal started
    /// moments ago divides by one day rather than zero. A goal with no
    /// records yields zero progress, never an error.
    pub fn calculate(goal: &Goal, records: &[Record], now: DateTime<Utc>) -> ProgressResult {
        let total_days_elapsed = elapsed_days(goal.start_date, now).max(1);

        let days_with_data: BTreeSet<NaiveDate> = records
            .iter()
            .map(|record| record.timestamp.date_naive())
            .collect();

        let ratio = days_with_data.len() as f64 / total_days_elapsed as f64 * 100.0;
        let completion_percentage = ratio.min(100.0);

        ProgressResult {
            completion_percentage,
            // Same ratio as completion today; kept as a distinct field
            // pending product clarification on diverging semantics
            consistency_percentage: completion_percentage,
            total_entries: records.len(),
            average_entries_per_day: records.len() as f64 / total_days_elapsed as f64,
        }
    }
}

/// Whole days between start and now, rounded up
fn elapsed_days(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - start).num_seconds();
    (seconds as f64 / 86_400.0).ceil() as i64
}
