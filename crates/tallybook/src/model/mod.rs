//! Ledger data types.
//!
//! Categories and records are the two persisted entities; the statistics
//! types are derived views computed by the storage layer.

pub mod category;
pub mod period;
pub mod record;
pub mod stats;

pub use category::{Category, CategoryRef, NewCategory, RecordType};
pub use period::Month;
pub use record::{NewRecord, Record, RecordUpdate};
pub use stats::{CategoryStat, CategoryStatsReport, MonthSummary, MonthTrend};
