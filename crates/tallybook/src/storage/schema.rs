//! `SQLite` schema definitions for tallybook.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the categories table.
pub const CREATE_CATEGORIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    icon TEXT NOT NULL DEFAULT '',
    type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
";

/// SQL statement to create the records table.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    amount REAL NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    category_id INTEGER NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (category_id) REFERENCES categories(id)
)
";

/// SQL statement to create an index on record date for month queries.
pub const CREATE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_date ON records(date)
";

/// SQL statement to create an index on `category_id` for joins and usage checks.
pub const CREATE_CATEGORY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_category ON records(category_id)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_CATEGORIES_TABLE,
    CREATE_RECORDS_TABLE,
    CREATE_DATE_INDEX,
    CREATE_CATEGORY_INDEX,
];
