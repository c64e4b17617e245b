//! Backing store access for feedback rows.
//!
//! The engine reads the feedback table through the [`FeedbackStore`]
//! trait so tests can substitute an in-memory store for the SQLite
//! implementation.

pub mod sqlite;

pub use sqlite::SqliteStore;

use thiserror::Error;

/// Errors surfaced by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened.
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The table name is not a plain identifier and cannot be queried.
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    /// The read query failed.
    #[error("feedback query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// One untyped row from the feedback table.
///
/// Every field is optional; the engine's normalization step applies the
/// documented fallbacks. The store itself never rejects a row.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRow {
    pub employee_id: Option<i64>,
    pub employee_name: Option<String>,
    pub employee_role: Option<String>,
    pub positive_percentage: Option<f64>,
    pub full_analysis: Option<String>,
    pub comment: Option<String>,
    pub quadrant: Option<String>,
}

/// Read access to the feedback table.
pub trait FeedbackStore {
    /// Fetch every row of the feedback table.
    ///
    /// Returns an empty vec when the table is reachable but has no rows;
    /// connectivity and query failures surface as [`StoreError`].
    fn fetch_all(&self) -> Result<Vec<FeedbackRow>, StoreError>;
}
