//! Data models for the sentiment analytics engine.
//!
//! This module contains the core data structures used throughout
//! the application for representing feedback records, engagement
//! quadrants, and aggregate summaries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score assumed for a row whose sentiment field is missing or unreadable.
pub const DEFAULT_SENTIMENT_SCORE: f64 = 50.0;

/// Engagement quadrant derived from a sentiment score.
///
/// Records carry the quadrant as a plain string because labels sourced
/// directly from the feedback table are trusted as-is; this enum covers
/// the four labels the classifier itself can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// High sentiment, engaged.
    Champion,
    /// Moderate sentiment, still participating.
    ConcernedButActive,
    /// Low-moderate sentiment, drifting.
    PotentiallyIsolated,
    /// Low sentiment, disengagement risk.
    AtRisk,
}

impl Quadrant {
    /// All quadrants, highest sentiment first.
    #[allow(dead_code)] // Utility for boundary layers that enumerate labels
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Champion,
        Quadrant::ConcernedButActive,
        Quadrant::PotentiallyIsolated,
        Quadrant::AtRisk,
    ];

    /// Classify a sentiment score into a quadrant.
    ///
    /// Thresholds are inclusive lower bounds, evaluated highest first.
    /// Total over all inputs: scores outside 0-100 are accepted, and NaN
    /// fails every comparison and lands in `AtRisk`.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Quadrant::Champion
        } else if score >= 50.0 {
            Quadrant::ConcernedButActive
        } else if score >= 30.0 {
            Quadrant::PotentiallyIsolated
        } else {
            Quadrant::AtRisk
        }
    }

    /// Returns the canonical label for this quadrant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Champion => "Champion",
            Quadrant::ConcernedButActive => "Concerned but active",
            Quadrant::PotentiallyIsolated => "Potentially Isolated",
            Quadrant::AtRisk => "At Risk",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One feedback observation for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Stable identifier (row ordinal when the source has no ID).
    pub id: i64,
    /// Employee identifier (same ordinal fallback as `id`).
    pub employee_id: i64,
    /// Display name, never empty.
    pub employee_name: String,
    /// Free-text analysis or comment, may be empty.
    pub content: String,
    /// Job role, `"Unknown"` when the source has none.
    pub role: String,
    /// Sentiment score, expected 0-100 but accepted unclamped.
    pub sentiment_score: f64,
    /// Engagement quadrant label. Classified from the score when the
    /// source has none; otherwise carried through unvalidated.
    pub quadrant: String,
}

/// Aggregate view over the current record set.
///
/// Derived fresh on every request, never persisted. Map keys appear in
/// first-seen order and only for values present in the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// Number of records in the current set.
    pub total_employees: usize,
    /// Mean sentiment score, 0.0 for an empty set.
    pub average_sentiment: f64,
    /// Record count per quadrant label.
    pub quadrant_distribution: IndexMap<String, usize>,
    /// Mean sentiment score per role.
    pub sentiment_by_role: IndexMap<String, f64>,
}
