//! Record entry and reporting.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::record::normalize_amount;
use crate::model::{
    Category, CategoryStatsReport, Month, MonthSummary, MonthTrend, NewRecord, Record, RecordType,
    RecordUpdate,
};
use crate::storage::Storage;

/// Record use cases and the statistics built on them.
#[derive(Debug, Clone, Copy)]
pub struct RecordService<'a> {
    storage: &'a Storage,
}

impl<'a> RecordService<'a> {
    /// Create a service over the given storage.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and store a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAmount`] for non-positive amounts,
    /// [`Error::CategoryNotFound`] for an unknown category,
    /// [`Error::TypeMismatch`] when the record and category types differ,
    /// or a database error.
    pub fn create(&self, record: NewRecord) -> Result<Record> {
        let amount = normalize_amount(record.amount)?;
        let category = self.category(record.category_id)?;
        if category.record_type != record.record_type {
            return Err(Error::TypeMismatch {
                record: record.record_type.to_string(),
                category: category.record_type.to_string(),
            });
        }

        let id = self.storage.insert_record(&NewRecord {
            amount,
            note: record.note.trim().to_string(),
            ..record
        })?;
        info!(
            "Recorded {} of {:.2} in '{}' on {}",
            category.record_type, amount, category.name, record.date
        );
        self.get(id)
    }

    /// Change an existing record; its type follows the chosen category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAmount`], [`Error::CategoryNotFound`],
    /// [`Error::RecordNotFound`], or a database error.
    pub fn update(&self, id: i64, update: RecordUpdate) -> Result<Record> {
        let amount = normalize_amount(update.amount)?;
        let category = self.category(update.category_id)?;

        let update = RecordUpdate {
            amount,
            note: update.note.trim().to_string(),
            ..update
        };
        if !self
            .storage
            .update_record(id, &update, category.record_type)?
        {
            return Err(Error::RecordNotFound { id });
        }
        self.get(id)
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for unknown IDs, or a database error.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.storage.delete_record(id)? {
            return Err(Error::RecordNotFound { id });
        }
        Ok(())
    }

    /// Get a record by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] for unknown IDs, or a database error.
    pub fn get(&self, id: i64) -> Result<Record> {
        self.storage
            .get_record(id)?
            .ok_or(Error::RecordNotFound { id })
    }

    /// Records of a month, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_by_month(&self, month: Month) -> Result<Vec<Record>> {
        self.storage.list_records_by_month(month)
    }

    /// The latest `limit` records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<Record>> {
        self.storage.recent_records(limit)
    }

    /// Income, expense and balance for a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn month_summary(&self, month: Month) -> Result<MonthSummary> {
        self.storage.month_summary(month)
    }

    /// Income and expense breakdowns by category for a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn category_stats(&self, month: Month) -> Result<CategoryStatsReport> {
        Ok(CategoryStatsReport {
            income_stats: self.storage.category_stats(month, RecordType::Income)?,
            expense_stats: self.storage.category_stats(month, RecordType::Expense)?,
        })
    }

    /// Month-by-month totals for a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn trend(&self, year: i32) -> Result<Vec<MonthTrend>> {
        self.storage.monthly_trends(year)
    }

    fn category(&self, id: i64) -> Result<Category> {
        self.storage
            .get_category(id)?
            .ok_or(Error::CategoryNotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::service::CategoryService;

    struct Fixture {
        storage: Storage,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                storage: Storage::open_in_memory().expect("failed to create test storage"),
            }
        }

        fn categories(&self) -> CategoryService<'_> {
            CategoryService::new(&self.storage)
        }

        fn records(&self) -> RecordService<'_> {
            RecordService::new(&self.storage)
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(category_id: i64, amount: f64, date: NaiveDate) -> NewRecord {
        NewRecord {
            amount,
            record_type: RecordType::Expense,
            category_id,
            note: String::new(),
            date,
        }
    }

    #[test]
    fn test_create_and_get() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "🍜", RecordType::Expense).unwrap();

        let mut input = expense(food.id, 18.456, day(2024, 1, 15));
        input.note = "  noodles ".to_string();
        let record = f.records().create(input).unwrap();

        assert!((record.amount - 18.46).abs() < f64::EPSILON);
        assert_eq!(record.note, "noodles");
        assert_eq!(record.category.as_ref().unwrap().name, "Food");
        assert_eq!(f.records().get(record.id).unwrap(), record);
    }

    #[test]
    fn test_create_rejects_invalid_amount() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "", RecordType::Expense).unwrap();

        for amount in [0.0, -3.0, f64::NAN, 1e307] {
            let err = f
                .records()
                .create(expense(food.id, amount, day(2024, 1, 1)))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidAmount { .. }));
        }
        assert_eq!(f.storage.count_records().unwrap(), 0);
    }

    #[test]
    fn test_create_rejects_unknown_category() {
        let f = Fixture::new();
        let err = f
            .records()
            .create(expense(12, 1.0, day(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::CategoryNotFound { id: 12 }));
    }

    #[test]
    fn test_create_rejects_type_mismatch() {
        let f = Fixture::new();
        let salary = f
            .categories()
            .create("Salary", "", RecordType::Income)
            .unwrap();

        let err = f
            .records()
            .create(expense(salary.id, 10.0, day(2024, 1, 1)))
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_update_follows_category_type() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "", RecordType::Expense).unwrap();
        let refund = f
            .categories()
            .create("Refund", "", RecordType::Income)
            .unwrap();
        let record = f
            .records()
            .create(expense(food.id, 30.0, day(2024, 2, 2)))
            .unwrap();

        let updated = f
            .records()
            .update(
                record.id,
                RecordUpdate {
                    amount: 30.0,
                    category_id: refund.id,
                    note: "returned".to_string(),
                    date: day(2024, 2, 9),
                },
            )
            .unwrap();

        assert_eq!(updated.record_type, RecordType::Income);
        assert_eq!(updated.category_id, refund.id);
        assert_eq!(updated.date, day(2024, 2, 9));
        assert_eq!(updated.created_at, record.created_at);
    }

    #[test]
    fn test_update_unknown_record() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "", RecordType::Expense).unwrap();
        let err = f
            .records()
            .update(
                77,
                RecordUpdate {
                    amount: 1.0,
                    category_id: food.id,
                    note: String::new(),
                    date: day(2024, 1, 1),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { id: 77 }));
    }

    #[test]
    fn test_delete() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "", RecordType::Expense).unwrap();
        let record = f
            .records()
            .create(expense(food.id, 1.0, day(2024, 1, 1)))
            .unwrap();

        f.records().delete(record.id).unwrap();
        assert!(f.records().get(record.id).unwrap_err().is_not_found());
        assert!(f.records().delete(record.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_category_stats_report_splits_types() {
        let f = Fixture::new();
        let food = f.categories().create("Food", "", RecordType::Expense).unwrap();
        let salary = f
            .categories()
            .create("Salary", "", RecordType::Income)
            .unwrap();
        f.records()
            .create(expense(food.id, 20.0, day(2024, 4, 3)))
            .unwrap();
        f.records()
            .create(NewRecord {
                amount: 500.0,
                record_type: RecordType::Income,
                category_id: salary.id,
                note: String::new(),
                date: day(2024, 4, 30),
            })
            .unwrap();

        let month = Month::new(2024, 4).unwrap();
        let report = f.records().category_stats(month).unwrap();
        assert_eq!(report.income_stats.len(), 1);
        assert_eq!(report.income_stats[0].category_name, "Salary");
        assert_eq!(report.expense_stats.len(), 1);
        assert_eq!(report.expense_stats[0].category_name, "Food");

        let summary = f.records().month_summary(month).unwrap();
        assert!((summary.balance - 480.0).abs() < 1e-9);

        let trend = f.records().trend(2024).unwrap();
        assert_eq!(trend.len(), 12);
        assert!((trend[3].income - 500.0).abs() < 1e-9);
    }
}
