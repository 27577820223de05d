//! Category management rules.

use tracing::info;

use crate::error::{Error, Result};
use crate::model::category::normalize_name;
use crate::model::{Category, NewCategory, RecordType};
use crate::storage::Storage;

/// Category use cases.
#[derive(Debug, Clone, Copy)]
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a service over the given storage.
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// List categories, optionally of one type, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, record_type: Option<RecordType>) -> Result<Vec<Category>> {
        self.storage.list_categories(record_type)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for unknown IDs.
    pub fn get(&self, id: i64) -> Result<Category> {
        self.storage
            .get_category(id)?
            .ok_or(Error::CategoryNotFound { id })
    }

    /// Create a category placed after every existing category of its type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] for blank names,
    /// [`Error::DuplicateCategory`] if the name is taken, or a database error.
    pub fn create(&self, name: &str, icon: &str, record_type: RecordType) -> Result<Category> {
        let name = normalize_name(name)?;
        if self.storage.get_category_by_name(&name)?.is_some() {
            return Err(Error::DuplicateCategory { name });
        }

        let sort_order = self.storage.max_sort_order(record_type)? + 1;
        let id = self.storage.insert_category(
            &NewCategory::new(name, icon.trim(), record_type),
            sort_order,
        )?;
        self.get(id)
    }

    /// Rename a category and change its icon.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for unknown IDs,
    /// [`Error::InvalidName`] for blank names, [`Error::DuplicateCategory`]
    /// if another category has the name, or a database error.
    pub fn update(&self, id: i64, name: &str, icon: &str) -> Result<Category> {
        let name = normalize_name(name)?;
        if let Some(existing) = self.storage.get_category_by_name(&name)? {
            if existing.id != id {
                return Err(Error::DuplicateCategory { name });
            }
        }

        if !self.storage.update_category(id, &name, icon.trim())? {
            return Err(Error::CategoryNotFound { id });
        }
        self.get(id)
    }

    /// Delete a category that no record references.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for unknown IDs,
    /// [`Error::CategoryInUse`] while records reference it, or a database error.
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.storage.delete_category(id)? {
            return Err(Error::CategoryNotFound { id });
        }
        Ok(())
    }

    /// Set the display order: the first ID gets position 1, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] if any ID is unknown (nothing is
    /// changed in that case), or a database error.
    pub fn reorder(&self, ids: &[i64]) -> Result<()> {
        for &id in ids {
            if self.storage.get_category(id)?.is_none() {
                return Err(Error::CategoryNotFound { id });
            }
        }
        self.storage.reorder_categories(ids)?;
        info!("Reordered {} categories", ids.len());
        Ok(())
    }
}
