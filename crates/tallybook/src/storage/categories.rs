//! Category queries.

use rusqlite::params;
use tracing::{debug, info};

use super::{is_constraint_violation, record_type_column, timestamp_column, timestamp_now, Storage};
use crate::error::{Error, Result};
use crate::model::{Category, NewCategory, RecordType};

const CATEGORY_COLUMNS: &str = "id, name, icon, type, sort_order, created_at";

impl Storage {
    /// List categories, optionally only those of one type, by sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_categories(&self, record_type: Option<RecordType>) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {CATEGORY_COLUMNS} FROM categories
            WHERE ?1 IS NULL OR type = ?1
            ORDER BY sort_order ASC, id ASC
            "
        ))?;

        let categories = stmt
            .query_map(
                params![record_type.map(|t| t.as_str())],
                Self::row_to_category,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.query_optional(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
            [id],
            Self::row_to_category,
        )
    }

    /// Get a category by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        self.query_optional(
            &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?1"),
            [name],
            Self::row_to_category,
        )
    }

    /// Insert a category with the given sort position and return its ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCategory`] if the name is taken, or an error
    /// if the database operation fails.
    pub fn insert_category(&self, category: &NewCategory, sort_order: i64) -> Result<i64> {
        self.conn
            .execute(
                r"
                INSERT INTO categories (name, icon, type, sort_order, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                params![
                    category.name,
                    category.icon,
                    category.record_type.as_str(),
                    sort_order,
                    timestamp_now(),
                ],
            )
            .map_err(|e| duplicate_or(e, &category.name))?;

        let id = self.conn.last_insert_rowid();
        info!(
            "Created {} category '{}' with id {}",
            category.record_type, category.name, id
        );
        Ok(id)
    }

    /// Change a category's name and icon.
    ///
    /// Returns `false` if no category has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCategory`] if the new name is taken, or an
    /// error if the database operation fails.
    pub fn update_category(&self, id: i64, name: &str, icon: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "UPDATE categories SET name = ?1, icon = ?2 WHERE id = ?3",
                params![name, icon, id],
            )
            .map_err(|e| duplicate_or(e, name))?;
        debug!("Updated category {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Delete a category.
    ///
    /// Returns `false` if no category has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryInUse`] while records reference the category,
    /// or an error if the database operation fails.
    pub fn delete_category(&self, id: i64) -> Result<bool> {
        let records = self.count_records_in_category(id)?;
        if records > 0 {
            return Err(Error::CategoryInUse { id, records });
        }

        let affected = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted category {}", id);
        }
        Ok(affected > 0)
    }

    /// Count records filed under a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_records_in_category(&self, id: i64) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE category_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Highest sort order among categories of a type, or 0 if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn max_sort_order(&self, record_type: RecordType) -> Result<i64> {
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), 0) FROM categories WHERE type = ?1",
            [record_type.as_str()],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Assign sort orders `1..=n` following the order of `ids`.
    ///
    /// Runs in a single transaction; IDs not present are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, in which case no
    /// order is changed.
    pub fn reorder_categories(&self, ids: &[i64]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE categories SET sort_order = ?1 WHERE id = ?2")?;
            for (position, id) in (1_i64..).zip(ids) {
                stmt.execute(params![position, id])?;
            }
        }
        tx.commit()?;

        debug!("Reordered {} categories", ids.len());
        Ok(())
    }

    /// Convert a database row to a Category struct.
    fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            icon: row.get(2)?,
            record_type: record_type_column(row, 3)?,
            sort_order: row.get(4)?,
            created_at: timestamp_column(row, 5)?,
        })
    }
}

/// Map a constraint violation on category writes to [`Error::DuplicateCategory`].
fn duplicate_or(err: rusqlite::Error, name: &str) -> Error {
    if is_constraint_violation(&err) {
        Error::DuplicateCategory {
            name: name.to_string(),
        }
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::NewRecord;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn expense(name: &str) -> NewCategory {
        NewCategory::new(name, "🏷", RecordType::Expense)
    }

    fn income(name: &str) -> NewCategory {
        NewCategory::new(name, "💰", RecordType::Income)
    }

    #[test]
    fn test_insert_and_get() {
        let storage = create_test_storage();
        let id = storage.insert_category(&expense("Food"), 1).unwrap();

        let category = storage.get_category(id).unwrap().unwrap();
        assert_eq!(category.name, "Food");
        assert_eq!(category.icon, "🏷");
        assert_eq!(category.record_type, RecordType::Expense);
        assert_eq!(category.sort_order, 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let storage = create_test_storage();
        assert!(storage.get_category(999).unwrap().is_none());
        assert!(storage.get_category_by_name("Nope").unwrap().is_none());
    }

    #[test]
    fn test_get_by_name() {
        let storage = create_test_storage();
        let id = storage.insert_category(&income("Salary"), 1).unwrap();

        let category = storage.get_category_by_name("Salary").unwrap().unwrap();
        assert_eq!(category.id, id);
    }

    #[test]
    fn test_duplicate_name_rejected_across_types() {
        let storage = create_test_storage();
        storage.insert_category(&expense("Gifts"), 1).unwrap();

        let err = storage.insert_category(&income("Gifts"), 1).unwrap_err();
        assert!(matches!(err, Error::DuplicateCategory { ref name } if name == "Gifts"));
    }

    #[test]
    fn test_list_filters_and_orders() {
        let storage = create_test_storage();
        storage.insert_category(&expense("Rent"), 2).unwrap();
        storage.insert_category(&expense("Food"), 1).unwrap();
        storage.insert_category(&income("Salary"), 1).unwrap();

        let all = storage.list_categories(None).unwrap();
        assert_eq!(all.len(), 3);

        let expenses = storage.list_categories(Some(RecordType::Expense)).unwrap();
        let names: Vec<_> = expenses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Rent"]);

        let incomes = storage.list_categories(Some(RecordType::Income)).unwrap();
        assert_eq!(incomes.len(), 1);
        assert_eq!(incomes[0].name, "Salary");
    }

    #[test]
    fn test_update_category() {
        let storage = create_test_storage();
        let id = storage.insert_category(&expense("Food"), 1).unwrap();

        assert!(storage.update_category(id, "Groceries", "🛒").unwrap());
        let category = storage.get_category(id).unwrap().unwrap();
        assert_eq!(category.name, "Groceries");
        assert_eq!(category.icon, "🛒");
        assert_eq!(category.sort_order, 1);
        assert_eq!(category.record_type, RecordType::Expense);
    }

    #[test]
    fn test_update_nonexistent() {
        let storage = create_test_storage();
        assert!(!storage.update_category(42, "X", "Y").unwrap());
    }

    #[test]
    fn test_update_to_taken_name() {
        let storage = create_test_storage();
        storage.insert_category(&expense("Food"), 1).unwrap();
        let rent = storage.insert_category(&expense("Rent"), 2).unwrap();

        let err = storage.update_category(rent, "Food", "🏠").unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_delete_unused_category() {
        let storage = create_test_storage();
        let id = storage.insert_category(&expense("Food"), 1).unwrap();

        assert!(storage.delete_category(id).unwrap());
        assert!(storage.get_category(id).unwrap().is_none());
        assert!(!storage.delete_category(id).unwrap());
    }

    #[test]
    fn test_delete_category_in_use() {
        let storage = create_test_storage();
        let id = storage.insert_category(&expense("Food"), 1).unwrap();
        storage
            .insert_record(&NewRecord {
                amount: 12.5,
                record_type: RecordType::Expense,
                category_id: id,
                note: "lunch".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            })
            .unwrap();

        let err = storage.delete_category(id).unwrap_err();
        assert!(matches!(err, Error::CategoryInUse { records: 1, .. }));
        assert!(storage.get_category(id).unwrap().is_some());
    }

    #[test]
    fn test_max_sort_order() {
        let storage = create_test_storage();
        assert_eq!(storage.max_sort_order(RecordType::Expense).unwrap(), 0);

        storage.insert_category(&expense("Food"), 3).unwrap();
        storage.insert_category(&expense("Rent"), 7).unwrap();
        storage.insert_category(&income("Salary"), 1).unwrap();

        assert_eq!(storage.max_sort_order(RecordType::Expense).unwrap(), 7);
        assert_eq!(storage.max_sort_order(RecordType::Income).unwrap(), 1);
    }

    #[test]
    fn test_reorder_categories() {
        let storage = create_test_storage();
        let a = storage.insert_category(&expense("A"), 1).unwrap();
        let b = storage.insert_category(&expense("B"), 2).unwrap();
        let c = storage.insert_category(&expense("C"), 3).unwrap();

        storage.reorder_categories(&[c, a, b]).unwrap();

        let names: Vec<_> = storage
            .list_categories(Some(RecordType::Expense))
            .unwrap()
            .into_iter()
            .map(|cat| cat.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(storage.get_category(b).unwrap().unwrap().sort_order, 3);
    }

    #[test]
    fn test_reorder_empty_is_noop() {
        let storage = create_test_storage();
        let a = storage.insert_category(&expense("A"), 5).unwrap();
        storage.reorder_categories(&[]).unwrap();
        assert_eq!(storage.get_category(a).unwrap().unwrap().sort_order, 5);
    }

    #[test]
    fn test_unicode_names() {
        let storage = create_test_storage();
        let id = storage.insert_category(&expense("餐饮"), 1).unwrap();
        let category = storage.get_category_by_name("餐饮").unwrap().unwrap();
        assert_eq!(category.id, id);
    }
}
