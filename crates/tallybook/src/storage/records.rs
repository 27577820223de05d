//! Record queries.

use rusqlite::params;
use tracing::{debug, info};

use super::{date_column, record_type_column, timestamp_column, timestamp_now, Storage};
use crate::error::Result;
use crate::model::period::DATE_FORMAT;
use crate::model::{CategoryRef, Month, NewRecord, Record, RecordType, RecordUpdate};

/// Records joined with their category.
const RECORD_SELECT: &str = r"
SELECT r.id, r.amount, r.type, r.category_id, r.note, r.date, r.created_at,
       c.id, c.name, c.icon, c.type
FROM records r
LEFT JOIN categories c ON r.category_id = c.id
";

/// Newest first; entries on the same day by entry time.
const RECORD_ORDER: &str = "ORDER BY r.date DESC, r.created_at DESC, r.id DESC";

impl Storage {
    /// Insert a record and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including a foreign
    /// key violation for an unknown category.
    pub fn insert_record(&self, record: &NewRecord) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO records (amount, type, category_id, note, date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.amount,
                record.record_type.as_str(),
                record.category_id,
                record.note,
                record.date.format(DATE_FORMAT).to_string(),
                timestamp_now(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "Inserted {} record {} in category {}",
            record.record_type, id, record.category_id
        );
        Ok(id)
    }

    /// Overwrite a record's editable fields.
    ///
    /// Returns `false` if no record has this ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_record(
        &self,
        id: i64,
        update: &RecordUpdate,
        record_type: RecordType,
    ) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE records
            SET amount = ?1, type = ?2, category_id = ?3, note = ?4, date = ?5
            WHERE id = ?6
            ",
            params![
                update.amount,
                record_type.as_str(),
                update.category_id,
                update.note,
                update.date.format(DATE_FORMAT).to_string(),
                id,
            ],
        )?;
        debug!("Updated record {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Delete a record by ID.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_record(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM records WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted record {}", id);
        }
        Ok(affected > 0)
    }

    /// Get a record by its ID, with its category joined.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_record(&self, id: i64) -> Result<Option<Record>> {
        self.query_optional(
            &format!("{RECORD_SELECT} WHERE r.id = ?1"),
            [id],
            Self::row_to_record,
        )
    }

    /// All records dated within a month, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_records_by_month(&self, month: Month) -> Result<Vec<Record>> {
        let (start, end) = month.date_bounds();
        let mut stmt = self.conn.prepare(&format!(
            "{RECORD_SELECT} WHERE r.date >= ?1 AND r.date < ?2 {RECORD_ORDER}"
        ))?;

        let records = stmt
            .query_map(params![start, end], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// The most recent records across all months.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent_records(&self, limit: usize) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT} {RECORD_ORDER} LIMIT ?1"))?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map([limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Every record, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_records(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT} {RECORD_ORDER}"))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count total records in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_records(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a joined database row to a Record struct.
    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
        let category_id: Option<i64> = row.get(7)?;
        let category = match category_id {
            Some(id) => Some(CategoryRef {
                id,
                name: row.get(8)?,
                icon: row.get(9)?,
                record_type: record_type_column(row, 10)?,
            }),
            None => None,
        };

        Ok(Record {
            id: row.get(0)?,
            amount: row.get(1)?,
            record_type: record_type_column(row, 2)?,
            category_id: row.get(3)?,
            category,
            note: row.get(4)?,
            date: date_column(row, 5)?,
            created_at: timestamp_column(row, 6)?,
        })
    }
}
