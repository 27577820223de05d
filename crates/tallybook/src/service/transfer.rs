//! Moving a whole ledger in and out of the store.
//!
//! Export produces an [`ExportBundle`] in which records name their category
//! instead of pointing at a database ID, so a bundle can be merged into any
//! other ledger. Import merges categories by name.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{CategoryService, RecordService};
use crate::error::Result;
use crate::model::category::normalize_name;
use crate::model::{NewRecord, RecordType};
use crate::storage::Storage;

/// Icon for categories that an import has to invent.
pub const DEFAULT_IMPORT_ICON: &str = "📦";

/// A portable snapshot of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// When the snapshot was taken.
    pub exported_at: DateTime<Utc>,
    /// Categories in display order.
    #[serde(default)]
    pub categories: Vec<ExportCategory>,
    /// Records, newest first.
    #[serde(default)]
    pub records: Vec<ExportRecord>,
}

/// A category as it appears in a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportCategory {
    /// Category name, the merge key.
    pub name: String,
    /// Icon.
    #[serde(default)]
    pub icon: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

/// A record as it appears in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Transaction day.
    pub date: NaiveDate,
    /// Income or expense.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Name of the category.
    pub category: String,
    /// Amount.
    pub amount: f64,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Categories that did not exist and were created.
    pub categories_created: usize,
    /// Existing categories reused by name, whether listed in the bundle or
    /// only named by a record.
    pub categories_merged: usize,
    /// Records stored.
    pub records_imported: usize,
    /// Records rejected by validation.
    pub records_skipped: usize,
}

/// Export and import use cases.
#[derive(Debug, Clone)]
pub struct TransferService<'a> {
    storage: &'a Storage,
    default_icon: String,
}

impl<'a> TransferService<'a> {
    /// Create a service over the given storage.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            default_icon: DEFAULT_IMPORT_ICON.to_string(),
        }
    }

    /// Use a different icon for categories created implicitly on import.
    #[must_use]
    pub fn with_default_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_icon = icon.into();
        self
    }

    /// Snapshot every category and record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn export(&self) -> Result<ExportBundle> {
        let categories = self.storage.list_categories(None)?;
        let names: HashMap<i64, String> = categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let records = self
            .storage
            .all_records()?
            .into_iter()
            .map(|r| ExportRecord {
                date: r.date,
                record_type: r.record_type,
                category: names.get(&r.category_id).cloned().unwrap_or_default(),
                amount: r.amount,
                note: r.note,
            })
            .collect::<Vec<_>>();

        let bundle = ExportBundle {
            exported_at: Utc::now(),
            categories: categories
                .into_iter()
                .map(|c| ExportCategory {
                    name: c.name,
                    icon: c.icon,
                    record_type: c.record_type,
                })
                .collect(),
            records,
        };
        info!(
            "Exported {} categories and {} records",
            bundle.categories.len(),
            bundle.records.len()
        );
        Ok(bundle)
    }

    /// Merge a bundle into the store.
    ///
    /// Categories are matched by name; unknown names are created after the
    /// existing categories of their type. Records naming a category absent
    /// from both the bundle and the store get a new category with the default
    /// icon. Invalid records are skipped and counted.
    ///
    /// # Errors
    ///
    /// Returns an error only if the database fails; the whole import is then
    /// rolled back.
    pub fn import(&self, bundle: &ExportBundle) -> Result<ImportReport> {
        let report = self.storage.in_transaction(|_| self.import_inner(bundle))?;
        info!(
            "Imported {} records ({} skipped), {} categories created, {} merged",
            report.records_imported,
            report.records_skipped,
            report.categories_created,
            report.categories_merged
        );
        Ok(report)
    }

    fn import_inner(&self, bundle: &ExportBundle) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        let mut resolved: HashMap<String, i64> = HashMap::new();

        for category in &bundle.categories {
            let Ok(name) = normalize_name(&category.name) else {
                warn!("Skipping bundle category with a blank name");
                continue;
            };
            if resolved.contains_key(&name) {
                continue;
            }
            let id = self.resolve_category(&name, &category.icon, category.record_type, &mut report)?;
            resolved.insert(name, id);
        }

        let records = RecordService::new(self.storage);
        for record in &bundle.records {
            let Ok(name) = normalize_name(&record.category) else {
                warn!("Skipping record dated {} without a category", record.date);
                report.records_skipped += 1;
                continue;
            };

            let category_id = if let Some(id) = resolved.get(&name) {
                *id
            } else {
                let id = self.resolve_category(
                    &name,
                    &self.default_icon,
                    record.record_type,
                    &mut report,
                )?;
                resolved.insert(name, id);
                id
            };

            let result = records.create(NewRecord {
                amount: record.amount,
                record_type: record.record_type,
                category_id,
                note: record.note.clone(),
                date: record.date,
            });
            match result {
                Ok(_) => report.records_imported += 1,
                Err(e) if is_record_rejection(&e) => {
                    warn!("Skipping record dated {}: {}", record.date, e);
                    report.records_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }

    /// Find a category by name or create it.
    fn resolve_category(
        &self,
        name: &str,
        icon: &str,
        record_type: RecordType,
        report: &mut ImportReport,
    ) -> Result<i64> {
        if let Some(existing) = self.storage.get_category_by_name(name)? {
            report.categories_merged += 1;
            return Ok(existing.id);
        }
        let created = CategoryService::new(self.storage).create(name, icon, record_type)?;
        report.categories_created += 1;
        Ok(created.id)
    }
}

/// Validation failures that skip a single record instead of aborting.
fn is_record_rejection(err: &crate::error::Error) -> bool {
    use crate::error::Error;
    matches!(
        err,
        Error::InvalidAmount { .. } | Error::TypeMismatch { .. } | Error::CategoryNotFound { .. }
    )
}
