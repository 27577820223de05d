//! Storage layer for tallybook.
//!
//! This module provides `SQLite`-based persistent storage for categories and
//! records, plus the aggregation queries behind monthly summaries, category
//! breakdowns and yearly trends.

mod categories;
pub mod migrations;
mod records;
pub mod schema;
mod stats;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::period::DATE_FORMAT;

/// Storage engine for the ledger.
///
/// Owns a single `SQLite` connection. Every operation is one statement or,
/// for reordering, one transaction.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::prepare_connection(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::prepare_connection(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Enable foreign keys and bring the schema up to date.
    fn prepare_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(conn)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_categories: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        let total_records = self.count_records()?;

        let (first_record_date, last_record_date) = self.conn.query_row(
            "SELECT MIN(date), MAX(date) FROM records",
            [],
            |row| Ok((optional_date_column(row, 0)?, optional_date_column(row, 1)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_categories,
            total_records,
            first_record_date,
            last_record_date,
            db_size_bytes,
        })
    }

    /// Run `f` inside a transaction, committing only if it succeeds.
    ///
    /// Must not be nested, and `f` must not call [`Storage::reorder_categories`],
    /// which opens its own transaction.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` (after rolling back) or from the database.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run a single-row query that may return nothing.
    fn query_optional<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        f: impl FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        Ok(self.conn.query_row(sql, params, f).optional()?)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of categories.
    pub total_categories: i64,
    /// Number of records.
    pub total_records: i64,
    /// Date of the earliest record.
    pub first_record_date: Option<NaiveDate>,
    /// Date of the latest record.
    pub last_record_date: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

/// Timestamp text stored in `created_at` columns.
///
/// Fixed-width RFC 3339 so lexicographic order matches time order.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Convert a text column with a fallible parser, reporting failures as
/// conversion errors on that column.
fn parse_column<T, E: std::fmt::Display>(
    idx: usize,
    value: &str,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> rusqlite::Result<T> {
    parse(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into())
    })
}

/// Read an RFC 3339 timestamp column.
fn timestamp_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    parse_column(idx, &text, |s| {
        DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
    })
}

/// Read a `YYYY-MM-DD` date column.
fn date_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    parse_column(idx, &text, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))
}

/// Read a nullable `YYYY-MM-DD` date column.
fn optional_date_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|text| parse_column(idx, &text, |s| NaiveDate::parse_from_str(s, DATE_FORMAT)))
        .transpose()
}

/// Read a record type column.
fn record_type_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<crate::model::RecordType> {
    let text: String = row.get(idx)?;
    parse_column(idx, &text, |s| s.parse::<crate::model::RecordType>())
}

/// Check whether an error is a `UNIQUE`/constraint violation.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
