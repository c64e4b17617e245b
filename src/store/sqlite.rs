//! SQLite-backed feedback store.
//!
//! Reads the whole feedback table in one query. Columns are resolved by
//! name and every value is coerced leniently: the table is typically bulk
//! loaded from CSV with every column as TEXT, so numbers may arrive as
//! strings and any field may be NULL.

use crate::store::{FeedbackRow, FeedbackStore, StoreError};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Columns the store looks for. All optional; anything else is ignored.
const COL_EMPLOYEE_ID: &str = "employee_id";
const COL_EMPLOYEE_NAME: &str = "employee_name";
const COL_EMPLOYEE_ROLE: &str = "employee_role";
const COL_POSITIVE_PERCENTAGE: &str = "positive_percentage";
const COL_FULL_ANALYSIS: &str = "full_analysis";
const COL_COMMENT: &str = "comment";
const COL_QUADRANT: &str = "quadrant";

/// Feedback store backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteStore {
    /// Open the database read-only and validate the table name.
    ///
    /// The table name is interpolated into the query, so only plain
    /// identifiers are accepted.
    pub fn open(path: &Path, table: &str) -> Result<Self, StoreError> {
        if !is_valid_table_name(table) {
            return Err(StoreError::InvalidTable(table.to_string()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| StoreError::Open {
                path: path.display().to_string(),
                source,
            })?;
        conn.busy_timeout(Duration::from_secs(5))?;

        info!("Opened feedback database: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }
}

impl FeedbackStore for SqliteStore {
    fn fetch_all(&self) -> Result<Vec<FeedbackRow>, StoreError> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());

        let mut stmt = conn.prepare(&format!("SELECT * FROM {}", self.table))?;
        let columns = column_indices(stmt.column_names());
        debug!("Feedback table has {} columns", columns.len());

        let mut rows = stmt.query([])?;
        let mut fetched = Vec::new();

        while let Some(row) = rows.next()? {
            let value = |name: &str| columns.get(name).and_then(|&idx| row.get_ref(idx).ok());

            fetched.push(FeedbackRow {
                employee_id: value(COL_EMPLOYEE_ID).and_then(value_to_i64),
                employee_name: value(COL_EMPLOYEE_NAME).and_then(value_to_string),
                employee_role: value(COL_EMPLOYEE_ROLE).and_then(value_to_string),
                positive_percentage: value(COL_POSITIVE_PERCENTAGE).and_then(value_to_f64),
                full_analysis: value(COL_FULL_ANALYSIS).and_then(value_to_string),
                comment: value(COL_COMMENT).and_then(value_to_string),
                quadrant: value(COL_QUADRANT).and_then(value_to_string),
            });
        }

        debug!("Fetched {} feedback rows", fetched.len());
        Ok(fetched)
    }
}

/// Map lowercased column names to their indices.
fn column_indices(names: Vec<&str>) -> HashMap<String, usize> {
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name.to_lowercase(), idx))
        .collect()
}

/// Accept only plain identifiers for the table name.
fn is_valid_table_name(table: &str) -> bool {
    let mut chars = table.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Coerce a SQL value to a string. NULL and BLOB read as missing.
fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().map(String::from),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// Coerce a SQL value to a finite float. Non-numeric text and non-finite
/// values read as missing so the normalization default applies.
fn value_to_f64(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) if f.is_finite() => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Coerce a SQL value to an integer, truncating floats like the numeric
/// ID coercion expects.
fn value_to_i64(value: ValueRef<'_>) -> Option<i64> {
    match value {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.is_finite() => Some(f as i64),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?;
            let trimmed = text.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn seed_database(dir: &TempDir, schema: &str, inserts: &[&str]) -> PathBuf {
        let path = dir.path().join("feedback.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(schema).unwrap();
        for insert in inserts {
            conn.execute(insert, []).unwrap();
        }
        path
    }

    #[test]
    fn test_table_name_validation() {
        assert!(is_valid_table_name("sentiment_reports"));
        assert!(is_valid_table_name("_tmp2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("reports; DROP TABLE x"));
        assert!(!is_valid_table_name("re-ports"));
    }

    #[test]
    fn test_open_rejects_bad_table() {
        let err = SqliteStore::open(Path::new("unused.db"), "bad name").unwrap_err();
        assert!(matches!(err, StoreError::InvalidTable(_)));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.db");
        let err = SqliteStore::open(&missing, "sentiment_reports").unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
    }

    #[test]
    fn test_fetch_all_text_columns() {
        // Bulk-loaded tables store everything as TEXT.
        let dir = TempDir::new().unwrap();
        let path = seed_database(
            &dir,
            "CREATE TABLE sentiment_reports (
                employee_id TEXT, employee_name TEXT, employee_role TEXT,
                positive_percentage TEXT, full_analysis TEXT, quadrant TEXT
            );",
            &[
                "INSERT INTO sentiment_reports VALUES
                    ('12', 'Alice', 'Engineer', '82.5', 'Loves the team', 'Champion')",
                "INSERT INTO sentiment_reports VALUES
                    (NULL, NULL, NULL, 'not-a-number', NULL, NULL)",
            ],
        );

        let store = SqliteStore::open(&path, "sentiment_reports").unwrap();
        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].employee_id, Some(12));
        assert_eq!(rows[0].employee_name.as_deref(), Some("Alice"));
        assert_eq!(rows[0].positive_percentage, Some(82.5));
        assert_eq!(rows[0].quadrant.as_deref(), Some("Champion"));

        // NULLs and unparseable numbers read as missing.
        assert_eq!(rows[1].employee_id, None);
        assert_eq!(rows[1].employee_name, None);
        assert_eq!(rows[1].positive_percentage, None);
    }

    #[test]
    fn test_fetch_all_missing_columns() {
        let dir = TempDir::new().unwrap();
        let path = seed_database(
            &dir,
            "CREATE TABLE sentiment_reports (employee_name TEXT, comment TEXT);",
            &["INSERT INTO sentiment_reports VALUES ('Bob', 'Fine overall')"],
        );

        let store = SqliteStore::open(&path, "sentiment_reports").unwrap();
        let rows = store.fetch_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name.as_deref(), Some("Bob"));
        assert_eq!(rows[0].comment.as_deref(), Some("Fine overall"));
        assert_eq!(rows[0].employee_id, None);
        assert_eq!(rows[0].positive_percentage, None);
        assert_eq!(rows[0].full_analysis, None);
    }

    #[test]
    fn test_fetch_all_missing_table_is_query_error() {
        let dir = TempDir::new().unwrap();
        let path = seed_database(&dir, "CREATE TABLE other (x TEXT);", &[]);

        let store = SqliteStore::open(&path, "sentiment_reports").unwrap();
        let err = store.fetch_all().unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_value_coercions() {
        assert_eq!(value_to_f64(ValueRef::Integer(70)), Some(70.0));
        assert_eq!(value_to_f64(ValueRef::Real(49.5)), Some(49.5));
        assert_eq!(value_to_f64(ValueRef::Text(b" 33.1 ")), Some(33.1));
        assert_eq!(value_to_f64(ValueRef::Text(b"NaN")), None);
        assert_eq!(value_to_f64(ValueRef::Text(b"inf")), None);
        assert_eq!(value_to_f64(ValueRef::Text(b"n/a")), None);
        assert_eq!(value_to_f64(ValueRef::Null), None);

        assert_eq!(value_to_i64(ValueRef::Integer(9)), Some(9));
        assert_eq!(value_to_i64(ValueRef::Real(9.7)), Some(9));
        assert_eq!(value_to_i64(ValueRef::Text(b"42")), Some(42));
        assert_eq!(value_to_i64(ValueRef::Text(b"42.9")), Some(42));
        assert_eq!(value_to_i64(ValueRef::Text(b"id-42")), None);

        assert_eq!(
            value_to_string(ValueRef::Text(b"Champion")),
            Some("Champion".to_string())
        );
        assert_eq!(value_to_string(ValueRef::Integer(5)), Some("5".to_string()));
        assert_eq!(value_to_string(ValueRef::Null), None);
    }
}
