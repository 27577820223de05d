//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::{Month, RecordType};

/// Category management commands.
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories in display order
    List {
        /// Only show categories of this type
        #[arg(short = 't', long = "type", value_enum)]
        record_type: Option<RecordTypeArg>,
    },

    /// Create a category at the end of its type's list
    Add {
        /// Category name (must be unique)
        name: String,

        /// Whether the category is for income or expenses
        #[arg(short = 't', long = "type", value_enum)]
        record_type: RecordTypeArg,

        /// Icon shown next to the name
        #[arg(short, long, default_value = "")]
        icon: String,
    },

    /// Rename a category or change its icon
    Edit {
        /// Category ID
        id: i64,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New icon
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a category that has no records
    Delete {
        /// Category ID
        id: i64,
    },

    /// Set the display order of categories
    Reorder {
        /// Category IDs in the desired order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

/// Record management commands.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add an income or expense record
    Add {
        /// Amount (positive, rounded to cents)
        amount: f64,

        /// Category ID
        #[arg(short, long)]
        category: i64,

        /// Record type; defaults to the category's type
        #[arg(short = 't', long = "type", value_enum)]
        record_type: Option<RecordTypeArg>,

        /// Transaction date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Change fields of an existing record
    Edit {
        /// Record ID
        id: i64,

        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,

        /// New category ID
        #[arg(short, long)]
        category: Option<i64>,

        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// New note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Delete a record
    Delete {
        /// Record ID
        id: i64,
    },

    /// Show a single record
    Show {
        /// Record ID
        id: i64,
    },

    /// List the records of a month
    List {
        /// Month (YYYY-MM); defaults to the current month
        #[arg(short, long, value_parser = parse_month)]
        month: Option<Month>,
    },

    /// Show the most recent records
    Recent {
        /// Number of records; defaults to the configured recent_limit
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Month (YYYY-MM); defaults to the current month
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<Month>,
}

/// Breakdown command arguments.
#[derive(Debug, Args)]
pub struct BreakdownCommand {
    /// Month (YYYY-MM); defaults to the current month
    #[arg(short, long, value_parser = parse_month)]
    pub month: Option<Month>,
}

/// Trend command arguments.
#[derive(Debug, Args)]
pub struct TrendCommand {
    /// Year; defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Destination JSON file
    pub file: PathBuf,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file produced by `tally export`
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Record type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordTypeArg {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl From<RecordTypeArg> for RecordType {
    fn from(arg: RecordTypeArg) -> Self {
        match arg {
            RecordTypeArg::Income => Self::Income,
            RecordTypeArg::Expense => Self::Expense,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

fn parse_month(input: &str) -> Result<Month, String> {
    input.parse().map_err(|e: crate::error::Error| e.to_string())
}
