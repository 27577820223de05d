//! Income and expense records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::{CategoryRef, RecordType};
use crate::error::{Error, Result};

/// A single income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Database identifier.
    pub id: i64,
    /// Positive amount, rounded to cents.
    pub amount: f64,
    /// Income or expense; always equal to the category's type.
    pub record_type: RecordType,
    /// The category this record is filed under.
    pub category_id: i64,
    /// The joined category, when it still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
    /// Free-form note, possibly empty.
    pub note: String,
    /// Calendar day the transaction happened on.
    pub date: NaiveDate,
    /// When the record was entered.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Amount, must be positive.
    pub amount: f64,
    /// Income or expense.
    pub record_type: RecordType,
    /// Target category.
    pub category_id: i64,
    /// Free-form note.
    pub note: String,
    /// Transaction day.
    pub date: NaiveDate,
}

/// Editable fields of an existing record.
///
/// The record type is not part of the update; it follows the category.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordUpdate {
    /// Amount, must be positive.
    pub amount: f64,
    /// Target category.
    pub category_id: i64,
    /// Free-form note.
    pub note: String,
    /// Transaction day.
    pub date: NaiveDate,
}

/// Round an amount to cents and reject anything that is not positive.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] for NaN, infinite, zero or negative amounts.
pub fn normalize_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }
    // Scaling to cents overflows for amounts near f64::MAX
    let rounded = round_cents(amount);
    if !rounded.is_finite() || rounded <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(rounded)
}

/// Round a monetary value to two decimal places.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
