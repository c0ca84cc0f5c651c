//! Record Store Module
//! Owns the `EmployeePerformance` table lifecycle over a SQLite connection.

use crate::data::{EmployeeRecord, ProcessorError, RawRow, RecordProcessor, StoredRecord};
use clap::ValueEnum;
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name of the single table managed by the store.
pub const TABLE_NAME: &str = "EmployeePerformance";

const DROP_SQL: &str = "DROP TABLE IF EXISTS EmployeePerformance";

const CREATE_SQL: &str = "CREATE TABLE IF NOT EXISTS EmployeePerformance (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL,
    department TEXT NOT NULL,
    performance_score REAL NOT NULL,
    years_with_company INTEGER NOT NULL,
    salary REAL NOT NULL
) STRICT";

const INSERT_SQL: &str = "INSERT INTO EmployeePerformance
    (employee_id, department, performance_score, years_with_company, salary)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_SQL: &str = "SELECT id, employee_id, department, performance_score, years_with_company, salary
    FROM EmployeePerformance ORDER BY id";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Connect(#[source] rusqlite::Error),
    #[error("Failed to provision table: {0}")]
    Provision(#[source] rusqlite::Error),
    #[error("Line {line} rejected: {source}")]
    InvalidRow {
        line: usize,
        #[source]
        source: ProcessorError,
    },
    #[error("Line {line} could not be inserted: {source}")]
    Insert {
        line: usize,
        #[source]
        source: rusqlite::Error,
    },
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Commit behaviour of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// One transaction for the whole import; a bad row leaves nothing behind.
    #[default]
    Atomic,
    /// Every row is committed on its own; rows before a bad row remain.
    PerRow,
}

/// Scoped handle on the relational store.
///
/// The connection is released by [`RecordStore::close`], or on drop when a
/// run aborts early.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Open (or create) the database file at `path`.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .map_err(StoreError::Connect)?;
        // Opening is lazy; touch the file so that an unusable path fails here.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(StoreError::Connect)?;
        debug!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Connect)?;
        Ok(Self { conn })
    }

    /// Drop and recreate the table. Every previously stored record is lost.
    pub fn provision(&self) -> Result<(), StoreError> {
        self.conn
            .execute(DROP_SQL, [])
            .map_err(StoreError::Provision)?;
        self.conn
            .execute(CREATE_SQL, [])
            .map_err(StoreError::Provision)?;
        info!(table = TABLE_NAME, "Table provisioned");
        Ok(())
    }

    /// Append `rows` in input order. Returns the number of inserted rows.
    ///
    /// Stops at the first row that does not fit the column types. What
    /// remains in the table after a failure depends on `mode`.
    pub fn bulk_insert(&mut self, rows: &[RawRow], mode: ImportMode) -> Result<usize, StoreError> {
        let inserted = match mode {
            ImportMode::Atomic => {
                let tx = self.conn.transaction()?;
                let inserted = Self::insert_rows(&tx, rows)?;
                tx.commit()?;
                inserted
            }
            ImportMode::PerRow => Self::insert_rows(&self.conn, rows)?,
        };
        info!(rows = inserted, ?mode, "Bulk insert complete");
        Ok(inserted)
    }

    fn insert_rows(conn: &Connection, rows: &[RawRow]) -> Result<usize, StoreError> {
        let mut stmt = conn.prepare_cached(INSERT_SQL)?;
        for (inserted, row) in rows.iter().enumerate() {
            let record = RecordProcessor::to_record(row).map_err(|source| {
                warn!(line = row.line, inserted, "Import aborted on invalid row");
                StoreError::InvalidRow {
                    line: row.line,
                    source,
                }
            })?;
            stmt.execute(params![
                record.employee_id,
                record.department,
                record.performance_score,
                record.years_with_company,
                record.salary,
            ])
            .map_err(|source| StoreError::Insert {
                line: row.line,
                source,
            })?;
        }
        Ok(rows.len())
    }

    /// Read the whole table, ordered by identity key.
    pub fn fetch_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_SQL)?;
        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    record: EmployeeRecord::new(
                        row.get(1)?,
                        row.get::<_, String>(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = records.len(), "Fetched table");
        Ok(records)
    }

    /// Number of rows currently in the table.
    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM EmployeePerformance", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Release the connection.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        debug!("Database connection closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;
    use tempfile::TempDir;

    fn raw(line: usize, id: i64, department: &str, score: f64, years: i64, salary: f64) -> RawRow {
        RawRow {
            line,
            employee_id: CellValue::Int(id),
            department: CellValue::Text(department.to_string()),
            performance_score: CellValue::Float(score),
            years_with_company: CellValue::Int(years),
            salary: CellValue::Float(salary),
        }
    }

    fn sample_rows() -> Vec<RawRow> {
        vec![
            raw(1, 1, "Sales", 80.0, 2, 50000.0),
            raw(2, 2, "Sales", 90.0, 4, 55000.0),
            raw(3, 3, "HR", 70.0, 1, 40000.0),
            raw(4, 4, "HR", 70.0, 1, 40000.0),
        ]
    }

    fn bad_third_row() -> Vec<RawRow> {
        let mut rows = sample_rows();
        rows[2].performance_score = CellValue::Text("n/a".into());
        rows
    }

    fn tuples(records: &[StoredRecord]) -> Vec<(i64, String, i64, i64, i64)> {
        let mut out: Vec<_> = records
            .iter()
            .map(|s| {
                let r = &s.record;
                (
                    r.employee_id,
                    r.department.clone(),
                    (r.performance_score * 100.0).round() as i64,
                    r.years_with_company,
                    (r.salary * 100.0).round() as i64,
                )
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_insert_then_fetch_round_trip() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();

        let mut rows = sample_rows();
        rows.reverse();
        assert_eq!(store.bulk_insert(&rows, ImportMode::Atomic).unwrap(), 4);

        let fetched = store.fetch_all().unwrap();
        let expected: Vec<StoredRecord> = sample_rows()
            .iter()
            .enumerate()
            .map(|(i, r)| StoredRecord {
                id: i as i64 + 1,
                record: RecordProcessor::to_record(r).unwrap(),
            })
            .collect();
        assert_eq!(tuples(&fetched), tuples(&expected));
    }

    #[test]
    fn test_fetch_preserves_insertion_order_and_ids() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();
        store.bulk_insert(&sample_rows(), ImportMode::PerRow).unwrap();

        let fetched = store.fetch_all().unwrap();
        let ids: Vec<i64> = fetched.iter().map(|s| s.id).collect();
        let employees: Vec<i64> = fetched.iter().map(|s| s.record.employee_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(employees, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_bulk_insert_appends_duplicates() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();
        store.bulk_insert(&sample_rows(), ImportMode::Atomic).unwrap();
        store.bulk_insert(&sample_rows(), ImportMode::Atomic).unwrap();
        assert_eq!(store.count().unwrap(), 8);
    }

    #[test]
    fn test_provision_is_idempotent() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();
        store.bulk_insert(&sample_rows(), ImportMode::Atomic).unwrap();

        store.provision().unwrap();
        store.provision().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.fetch_all().unwrap().is_empty());

        store.bulk_insert(&sample_rows()[..1], ImportMode::Atomic).unwrap();
        assert_eq!(store.fetch_all().unwrap()[0].id, 1);
    }

    #[test]
    fn test_atomic_import_rolls_back_on_invalid_row() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();

        match store.bulk_insert(&bad_third_row(), ImportMode::Atomic) {
            Err(StoreError::InvalidRow { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected invalid row, got {:?}", other),
        }
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_per_row_import_keeps_rows_before_failure() {
        let mut store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();

        let result = store.bulk_insert(&bad_third_row(), ImportMode::PerRow);
        assert!(matches!(result, Err(StoreError::InvalidRow { line: 3, .. })));

        let kept: Vec<i64> = store
            .fetch_all()
            .unwrap()
            .iter()
            .map(|s| s.record.employee_id)
            .collect();
        assert_eq!(kept, vec![1, 2]);
    }

    #[test]
    fn test_strict_table_rejects_text_in_numeric_column() {
        let store = RecordStore::in_memory().unwrap();
        store.provision().unwrap();
        let result = store.conn.execute(
            "INSERT INTO EmployeePerformance (employee_id, department, performance_score, years_with_company, salary)
             VALUES ('abc', 'Sales', 1.0, 1, 1.0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_connect_file_and_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("companydata.db");

        let mut store = RecordStore::connect(&path).unwrap();
        store.provision().unwrap();
        store.bulk_insert(&sample_rows(), ImportMode::Atomic).unwrap();
        store.close().unwrap();

        let store = RecordStore::connect(&path).unwrap();
        assert_eq!(store.count().unwrap(), 4);
        store.close().unwrap();
    }

    #[test]
    fn test_connect_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("companydata.db");
        assert!(matches!(
            RecordStore::connect(&path),
            Err(StoreError::Connect(_))
        ));
    }
}
