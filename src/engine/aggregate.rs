//! Aggregate queries over the record set.
//!
//! Pure functions over a record slice; the engine calls them under a
//! single read lock so one summary always reflects one snapshot.

use crate::models::{AnalyticsSummary, EmployeeRecord};
use indexmap::IndexMap;

/// Arithmetic mean of all sentiment scores. 0.0 for an empty set, as a
/// defined sentinel rather than an error.
pub fn average_sentiment(records: &[EmployeeRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records.iter().map(|r| r.sentiment_score).sum();
    total / records.len() as f64
}

/// Record count per quadrant label, keys in first-seen order. A label
/// absent from the data is absent from the map.
pub fn quadrant_distribution(records: &[EmployeeRecord]) -> IndexMap<String, usize> {
    let mut distribution: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        *distribution.entry(record.quadrant.clone()).or_insert(0) += 1;
    }
    distribution
}

/// Mean sentiment score per role, keys in first-seen order. A role key
/// only exists when at least one record carries it, so the division is
/// always over a positive count.
pub fn sentiment_by_role(records: &[EmployeeRecord]) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, (f64, usize)> = IndexMap::new();
    for record in records {
        let entry = totals.entry(record.role.clone()).or_insert((0.0, 0));
        entry.0 += record.sentiment_score;
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(role, (sum, count))| (role, sum / count as f64))
        .collect()
}

/// Compose the three aggregate queries plus the record count into one
/// summary over a single snapshot.
pub fn summarize(records: &[EmployeeRecord]) -> AnalyticsSummary {
    AnalyticsSummary {
        total_employees: records.len(),
        average_sentiment: average_sentiment(records),
        quadrant_distribution: quadrant_distribution(records),
        sentiment_by_role: sentiment_by_role(records),
    }
}
