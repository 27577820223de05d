//! Aggregation queries.

use std::collections::HashMap;

use rusqlite::params;
use tracing::debug;

use super::Storage;
use crate::error::Result;
use crate::model::record::round_cents;
use crate::model::{CategoryStat, Month, MonthSummary, MonthTrend, RecordType};

impl Storage {
    /// Income and expense totals for a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn month_summary(&self, month: Month) -> Result<MonthSummary> {
        let (start, end) = month.date_bounds();
        let (income, expense): (f64, f64) = self.conn.query_row(
            r"
            SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0.0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0.0)
            FROM records
            WHERE date >= ?1 AND date < ?2
            ",
            params![start, end],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(MonthSummary::new(round_cents(income), round_cents(expense)))
    }

    /// Per-category totals of one record type within a month.
    ///
    /// Categories without records in the month are omitted. Entries are
    /// ordered by amount, largest first, and carry their share of the month's
    /// total for that type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn category_stats(&self, month: Month, record_type: RecordType) -> Result<Vec<CategoryStat>> {
        let (start, end) = month.date_bounds();
        let mut stmt = self.conn.prepare(
            r"
            SELECT c.id, c.name, c.icon, SUM(r.amount) AS total
            FROM records r
            JOIN categories c ON c.id = r.category_id
            WHERE r.type = ?1 AND r.date >= ?2 AND r.date < ?3
            GROUP BY c.id, c.name, c.icon
            HAVING total > 0
            ORDER BY total DESC, c.sort_order ASC, c.id ASC
            ",
        )?;

        let mut stats = stmt
            .query_map(params![record_type.as_str(), start, end], |row| {
                Ok(CategoryStat {
                    category_id: row.get(0)?,
                    category_name: row.get(1)?,
                    category_icon: row.get(2)?,
                    amount: round_cents(row.get(3)?),
                    percentage: 0.0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let total: f64 = stats.iter().map(|s| s.amount).sum();
        if total > 0.0 {
            for stat in &mut stats {
                stat.percentage = stat.amount / total * 100.0;
            }
        }

        debug!(
            "Computed {} {} category stats for {}",
            stats.len(),
            record_type,
            month
        );
        Ok(stats)
    }

    /// Monthly income and expense totals for every month of a year.
    ///
    /// Always returns twelve entries, January first; months without records
    /// report zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is out of range or the database operation fails.
    pub fn monthly_trends(&self, year: i32) -> Result<Vec<MonthTrend>> {
        let months = Month::all_in_year(year)?;
        let start = months[0].date_bounds().0;
        let end = months[11].date_bounds().1;

        let mut stmt = self.conn.prepare(
            r"
            SELECT
                substr(date, 1, 7) AS month,
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount END), 0.0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount END), 0.0)
            FROM records
            WHERE date >= ?1 AND date < ?2
            GROUP BY month
            ",
        )?;

        let totals = stmt
            .query_map(params![start, end], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    (row.get::<_, f64>(1)?, row.get::<_, f64>(2)?),
                ))
            })?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;

        let trends = months
            .iter()
            .map(|month| {
                let key = month.to_string();
                let (income, expense) = totals.get(&key).copied().unwrap_or((0.0, 0.0));
                MonthTrend {
                    month: key,
                    income: round_cents(income),
                    expense: round_cents(expense),
                }
            })
            .collect();

        Ok(trends)
    }
}
