//! `tallybook` - A local personal income and expense tracker
//!
//! This library provides the ledger core: user-defined income and expense
//! categories, dated records, and the monthly summaries, category breakdowns
//! and yearly trends computed from them, all persisted in a local `SQLite`
//! database.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{
    Category, CategoryStat, CategoryStatsReport, Month, MonthSummary, MonthTrend, NewRecord,
    Record, RecordType, RecordUpdate,
};
pub use service::{CategoryService, ExportBundle, ImportReport, RecordService, TransferService};
pub use storage::{Storage, StorageStats};
