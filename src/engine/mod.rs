//! Analytics engine.
//!
//! Owns the in-memory record set and provides the load, classification,
//! aggregation, and AI delegation operations. The record set lives behind
//! a read-write lock: `load` builds the replacement set completely before
//! publishing it under one write, so concurrent readers always observe
//! either the old set or the new set in full.

pub mod aggregate;
pub mod normalize;

use crate::ai::{AiError, GenAiClient};
use crate::models::{AnalyticsSummary, EmployeeRecord};
use crate::store::{FeedbackStore, StoreError};
use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{info, warn};

/// Result of a successful load call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The record set was replaced with this many records.
    Loaded(usize),
    /// The store was reachable but held no rows; the record set is now
    /// empty. Distinct from a connectivity failure, which is an error
    /// and leaves the previous set in place.
    Empty,
}

/// The sentiment analytics engine.
///
/// Built once at startup with an explicit store (and optional AI client)
/// and shared by reference across callers.
pub struct AnalyticsEngine {
    store: Box<dyn FeedbackStore + Send + Sync>,
    ai: Option<GenAiClient>,
    records: RwLock<Vec<EmployeeRecord>>,
}

impl AnalyticsEngine {
    /// Create an engine with an empty record set.
    pub fn new(store: Box<dyn FeedbackStore + Send + Sync>, ai: Option<GenAiClient>) -> Self {
        Self {
            store,
            ai,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Replace the record set wholesale from the backing store.
    ///
    /// On a store failure the current set is left untouched and the error
    /// is returned. Zero rows clears the set and reports
    /// [`LoadOutcome::Empty`]. No merge, no de-duplication: each load
    /// discards whatever the previous one held.
    pub fn load(&self) -> Result<LoadOutcome, StoreError> {
        let rows = self.store.fetch_all()?;

        if rows.is_empty() {
            warn!("Feedback table returned no rows");
            self.write_records(Vec::new());
            return Ok(LoadOutcome::Empty);
        }

        let records: Vec<EmployeeRecord> = rows
            .into_iter()
            .enumerate()
            .map(|(ordinal, row)| normalize::normalize_row(row, ordinal))
            .collect();

        let count = records.len();
        self.write_records(records);
        info!("Loaded {} employee records", count);

        Ok(LoadOutcome::Loaded(count))
    }

    /// Snapshot of the current records, optionally filtered by exact,
    /// case-sensitive quadrant label.
    pub fn employees(&self, quadrant: Option<&str>) -> Vec<EmployeeRecord> {
        let records = self.read_records();
        match quadrant {
            Some(label) => records
                .iter()
                .filter(|r| r.quadrant == label)
                .cloned()
                .collect(),
            None => records.clone(),
        }
    }

    /// Mean sentiment score of the current set, 0.0 when empty.
    #[allow(dead_code)] // Single-statistic accessor for boundary layers
    pub fn average_sentiment(&self) -> f64 {
        aggregate::average_sentiment(&self.read_records())
    }

    /// Record count per quadrant label present in the current set.
    #[allow(dead_code)] // Single-statistic accessor for boundary layers
    pub fn quadrant_distribution(&self) -> IndexMap<String, usize> {
        aggregate::quadrant_distribution(&self.read_records())
    }

    /// Mean sentiment score per role present in the current set.
    #[allow(dead_code)] // Single-statistic accessor for boundary layers
    pub fn sentiment_by_role(&self) -> IndexMap<String, f64> {
        aggregate::sentiment_by_role(&self.read_records())
    }

    /// Compute the summary view fresh from a single snapshot.
    pub fn summary(&self) -> AnalyticsSummary {
        aggregate::summarize(&self.read_records())
    }

    /// Delegate a natural-language question, with a prepared context
    /// block, to the configured text-generation service.
    pub async fn analyze_with_ai(&self, query: &str, context: &str) -> Result<String, AiError> {
        match &self.ai {
            Some(client) => client.analyze(query, context).await,
            None => Err(AiError::NotConfigured),
        }
    }

    fn read_records(&self) -> RwLockReadGuard<'_, Vec<EmployeeRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_records(&self, records: Vec<EmployeeRecord>) {
        let mut guard = self.records.write().unwrap_or_else(PoisonError::into_inner);
        *guard = records;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FeedbackRow;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<Vec<FeedbackRow>>,
        fail: AtomicBool,
    }

    impl FakeStore {
        fn set_rows(&self, rows: Vec<FeedbackRow>) {
            *self.rows.lock().unwrap() = rows;
        }
    }

    impl FeedbackStore for FakeStore {
        fn fetch_all(&self) -> Result<Vec<FeedbackRow>, StoreError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Query(rusqlite::Error::InvalidQuery));
            }
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    impl FeedbackStore for Arc<FakeStore> {
        fn fetch_all(&self) -> Result<Vec<FeedbackRow>, StoreError> {
            (**self).fetch_all()
        }
    }

    fn row(score: f64, role: &str) -> FeedbackRow {
        FeedbackRow {
            positive_percentage: Some(score),
            employee_role: Some(role.to_string()),
            ..FeedbackRow::default()
        }
    }

    fn engine_with(store: Arc<FakeStore>) -> AnalyticsEngine {
        AnalyticsEngine::new(Box::new(store), None)
    }

    #[test]
    fn test_load_classifies_and_aggregates() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![
            row(80.0, "Engineer"),
            row(40.0, "Engineer"),
            row(20.0, "Sales"),
        ]);
        let engine = engine_with(store);

        assert_eq!(engine.load().unwrap(), LoadOutcome::Loaded(3));
        assert!((engine.average_sentiment() - 46.67).abs() < 0.01);

        let distribution = engine.quadrant_distribution();
        assert_eq!(distribution.get("Champion"), Some(&1));
        assert_eq!(distribution.get("Potentially Isolated"), Some(&1));
        assert_eq!(distribution.get("At Risk"), Some(&1));
    }

    #[test]
    fn test_reload_replaces_wholesale() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![
            row(80.0, "Engineer"),
            row(40.0, "Engineer"),
            row(20.0, "Sales"),
        ]);
        let engine = engine_with(store.clone());
        engine.load().unwrap();

        store.set_rows(vec![row(55.0, "Engineer")]);
        assert_eq!(engine.load().unwrap(), LoadOutcome::Loaded(1));

        let summary = engine.summary();
        assert_eq!(summary.total_employees, 1);
        assert_eq!(
            summary.quadrant_distribution.get("Concerned but active"),
            Some(&1)
        );
        // No residue from the prior set.
        assert_eq!(summary.quadrant_distribution.get("Champion"), None);
        assert_eq!(summary.quadrant_distribution.get("At Risk"), None);
        assert_eq!(summary.sentiment_by_role.get("Sales"), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_set() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![row(80.0, "Engineer")]);
        let engine = engine_with(store.clone());
        engine.load().unwrap();

        store.fail.store(true, Ordering::SeqCst);
        assert!(engine.load().is_err());
        assert_eq!(engine.summary().total_employees, 1);
    }

    #[test]
    fn test_empty_result_clears_set() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![row(80.0, "Engineer")]);
        let engine = engine_with(store.clone());
        engine.load().unwrap();

        store.set_rows(Vec::new());
        assert_eq!(engine.load().unwrap(), LoadOutcome::Empty);
        assert_eq!(engine.summary().total_employees, 0);
        assert_eq!(engine.average_sentiment(), 0.0);
    }

    #[test]
    fn test_quadrant_filter_is_exact_and_case_sensitive() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![
            row(80.0, "Engineer"),
            row(20.0, "Sales"),
            row(10.0, "Sales"),
        ]);
        let engine = engine_with(store);
        engine.load().unwrap();

        let at_risk = engine.employees(Some("At Risk"));
        assert_eq!(at_risk.len(), 2);
        assert!(at_risk.iter().all(|r| r.quadrant == "At Risk"));

        assert!(engine.employees(Some("at risk")).is_empty());
        assert!(engine.employees(Some("At")).is_empty());
        assert_eq!(engine.employees(None).len(), 3);
    }

    #[test]
    fn test_summary_is_idempotent_between_loads() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![row(61.0, "Engineer"), row(47.0, "Support")]);
        let engine = engine_with(store);
        engine.load().unwrap();

        assert_eq!(engine.summary(), engine.summary());
    }

    #[test]
    fn test_ordinal_fallback_follows_row_order() {
        let store = Arc::new(FakeStore::default());
        store.set_rows(vec![FeedbackRow::default(), FeedbackRow::default()]);
        let engine = engine_with(store);
        engine.load().unwrap();

        let employees = engine.employees(None);
        assert_eq!(employees[0].id, 0);
        assert_eq!(employees[1].id, 1);
        assert_eq!(employees[1].employee_name, "Employee 1");
    }

    #[tokio::test]
    async fn test_analyze_without_client_is_not_configured() {
        let engine = engine_with(Arc::new(FakeStore::default()));
        let err = engine.analyze_with_ai("any question", "any context").await;
        assert!(matches!(err, Err(AiError::NotConfigured)));
    }
}
