//! Aggregated views over records.

use serde::{Deserialize, Serialize};

/// Income and expense totals for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Sum of income records.
    pub total_income: f64,
    /// Sum of expense records.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
}

impl MonthSummary {
    /// Build a summary from the two totals.
    #[must_use]
    pub fn new(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// One category's share of a month's income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    /// Category identifier.
    pub category_id: i64,
    /// Category name.
    pub category_name: String,
    /// Category icon.
    pub category_icon: String,
    /// Sum of the category's records in the month.
    pub amount: f64,
    /// Share of the month's total for this record type, 0 to 100.
    pub percentage: f64,
}

/// Per-category breakdown of a month, split by record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStatsReport {
    /// Income categories, largest first.
    pub income_stats: Vec<CategoryStat>,
    /// Expense categories, largest first.
    pub expense_stats: Vec<CategoryStat>,
}

/// Income and expense totals for one month of a yearly trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTrend {
    /// Month in `YYYY-MM` form.
    pub month: String,
    /// Sum of income records.
    pub income: f64,
    /// Sum of expense records.
    pub expense: f64,
}
