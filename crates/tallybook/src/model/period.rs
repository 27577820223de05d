//! Calendar month used by listings and statistics.

use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text format for stored record dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar month, e.g. `2024-03`.
///
/// Serialized as its `YYYY-MM` text; deserialization validates like [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, validating that `month` is in `1..=12`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMonth`] when the month is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::invalid_month(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// The month containing the given date.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, 1 through 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month that follows this one.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Half-open date bounds `[first day, first day of next month)` as stored text.
    #[must_use]
    pub fn date_bounds(&self) -> (String, String) {
        let next = self.next();
        (
            format!("{:04}-{:02}-01", self.year, self.month),
            format!("{:04}-{:02}-01", next.year, next.month),
        )
    }

    /// All twelve months of a year, January first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMonth`] if the year is outside chrono's range.
    pub fn all_in_year(year: i32) -> Result<Vec<Self>> {
        (1..=12).map(|m| Self::new(year, m)).collect()
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s.split_once('-').ok_or_else(|| Error::invalid_month(s))?;
        let year: i32 = year.parse().map_err(|_| Error::invalid_month(s))?;
        let month: u32 = month.parse().map_err(|_| Error::invalid_month(s))?;
        Self::new(year, month).map_err(|_| Error::invalid_month(s))
    }
}

impl TryFrom<String> for Month {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] on malformed input.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| Error::invalid_date(input))
}
