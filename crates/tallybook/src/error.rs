//! Error types for tallybook.
//!
//! This module defines all error types used throughout the tallybook crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tallybook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Ledger Errors ===
    /// No category has the given ID.
    #[error("category {id} not found")]
    CategoryNotFound {
        /// The requested category ID.
        id: i64,
    },

    /// The category is still referenced by records.
    #[error("category {id} is in use by {records} record(s) and cannot be deleted")]
    CategoryInUse {
        /// The category ID.
        id: i64,
        /// Number of records referencing it.
        records: i64,
    },

    /// A category with this name already exists.
    #[error("a category named '{name}' already exists")]
    DuplicateCategory {
        /// The conflicting name.
        name: String,
    },

    /// No record has the given ID.
    #[error("record {id} not found")]
    RecordNotFound {
        /// The requested record ID.
        id: i64,
    },

    /// The amount is not a positive finite number.
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: f64,
    },

    /// The date could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// The month could not be parsed or is out of range.
    #[error("invalid month '{input}', expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input.
        input: String,
    },

    /// Unknown record type string.
    #[error("invalid record type '{input}', expected 'income' or 'expense'")]
    InvalidRecordType {
        /// The rejected input.
        input: String,
    },

    /// A category name was empty.
    #[error("category name must not be empty")]
    InvalidName,

    /// The record type does not match its category's type.
    #[error("record type '{record}' does not match category type '{category}'")]
    TypeMismatch {
        /// Type requested for the record.
        record: String,
        /// Type of the category.
        category: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for tallybook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid date error.
    #[must_use]
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
        }
    }

    /// Create an invalid month error.
    #[must_use]
    pub fn invalid_month(input: impl Into<String>) -> Self {
        Self::InvalidMonth {
            input: input.into(),
        }
    }

    /// Check if this error means a requested entity does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound { .. } | Self::RecordNotFound { .. }
        )
    }

    /// Check if this error is a conflict with existing data.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::CategoryInUse { .. } | Self::DuplicateCategory { .. }
        )
    }
}
