//! Use-case services over [`Storage`](crate::storage::Storage).
//!
//! Storage runs the statements; services own the ledger rules: validation,
//! sort order assignment, deletion guards and import merging.

mod category;
mod record;
mod transfer;

pub use category::CategoryService;
pub use record::RecordService;
pub use transfer::{
    ExportBundle, ExportCategory, ExportRecord, ImportReport, TransferService, DEFAULT_IMPORT_ICON,
};
