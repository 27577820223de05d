//! Category types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl RecordType {
    /// Both record types, income first.
    pub const ALL: [RecordType; 2] = [RecordType::Income, RecordType::Expense];

    /// The text form stored in the database.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidRecordType {
                input: other.to_string(),
            }),
        }
    }
}

/// A user-defined category that records are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Database identifier.
    pub id: i64,
    /// Display name, unique across all categories.
    pub name: String,
    /// Short icon, usually a single emoji.
    pub icon: String,
    /// Which kind of record this category accepts.
    pub record_type: RecordType,
    /// Position within categories of the same type, ascending.
    pub sort_order: i64,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// The reduced view embedded in records.
    #[must_use]
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon.clone(),
            record_type: self.record_type,
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Short icon.
    pub icon: String,
    /// Which kind of record this category accepts.
    pub record_type: RecordType,
}

impl NewCategory {
    /// Create a new category input.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            record_type,
        }
    }
}

/// The category fields joined onto a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Database identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Short icon.
    pub icon: String,
    /// Category type.
    pub record_type: RecordType,
}

/// Trim a category name and reject it if nothing is left.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] for blank names.
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_display() {
        assert_eq!(RecordType::Income.to_string(), "income");
        assert_eq!(RecordType::Expense.to_string(), "expense");
    }

    #[test]
    fn test_record_type_from_str() {
        assert_eq!("income".parse::<RecordType>().unwrap(), RecordType::Income);
        assert_eq!(
            "expense".parse::<RecordType>().unwrap(),
            RecordType::Expense
        );
        assert!(matches!(
            "Expense".parse::<RecordType>(),
            Err(Error::InvalidRecordType { .. })
        ));
    }

    #[test]
    fn test_record_type_serde() {
        let json = serde_json::to_string(&RecordType::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
        let parsed: RecordType = serde_json::from_str("\"income\"").unwrap();
        assert_eq!(parsed, RecordType::Income);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Groceries ").unwrap(), "Groceries");
        assert!(matches!(normalize_name("   "), Err(Error::InvalidName)));
        assert!(matches!(normalize_name(""), Err(Error::InvalidName)));
    }

    #[test]
    fn test_to_ref() {
        let category = Category {
            id: 4,
            name: "Salary".to_string(),
            icon: "💰".to_string(),
            record_type: RecordType::Income,
            sort_order: 1,
            created_at: Utc::now(),
        };
        let r = category.to_ref();
        assert_eq!(r.id, 4);
        assert_eq!(r.name, "Salary");
        assert_eq!(r.record_type, RecordType::Income);
    }
}
