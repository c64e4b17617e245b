//! Row normalization.
//!
//! Turns an untyped feedback row into a fully-populated
//! [`EmployeeRecord`]. Normalization is total: a missing or unreadable
//! field takes its documented fallback, and no row is ever rejected.
//!
//! Fallbacks:
//! - `employee_id` missing: the row ordinal stands in for both IDs
//! - `employee_name` missing: `"Employee {ordinal}"`
//! - content: `full_analysis`, then `comment`, then empty
//! - `employee_role` missing: `"Unknown"`
//! - `positive_percentage` missing: 50.0
//! - `quadrant` missing: classified from the (possibly defaulted) score

use crate::models::{EmployeeRecord, Quadrant, DEFAULT_SENTIMENT_SCORE};
use crate::store::FeedbackRow;

/// Normalize one row. `ordinal` is the zero-based position of the row in
/// the query result and backs the ID and name fallbacks.
pub fn normalize_row(row: FeedbackRow, ordinal: usize) -> EmployeeRecord {
    let score = row.positive_percentage.unwrap_or(DEFAULT_SENTIMENT_SCORE);
    let id = row.employee_id.unwrap_or(ordinal as i64);

    // A sourced quadrant label is trusted as-is, without validating it
    // against the four known labels.
    let quadrant = row
        .quadrant
        .unwrap_or_else(|| Quadrant::from_score(score).as_str().to_string());

    EmployeeRecord {
        id,
        employee_id: id,
        employee_name: row
            .employee_name
            .unwrap_or_else(|| format!("Employee {}", ordinal)),
        content: row.full_analysis.or(row.comment).unwrap_or_default(),
        role: row.employee_role.unwrap_or_else(|| "Unknown".to_string()),
        sentiment_score: score,
        quadrant,
    }
}
