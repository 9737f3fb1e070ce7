//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. Names are
//! unique per user.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Category, CategoryId, TransactionKind, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.user_id.cmp(&b.user_id).then(a.name.cmp(&b.name)));

        write_json_atomic(&self.path, &CategoryData { categories: list })
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, TallyError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    /// A user's categories sorted by name, optionally of one kind
    pub fn for_user(
        &self,
        user_id: UserId,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<Category>, TallyError> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut list: Vec<_> = categories
            .values()
            .filter(|c| c.user_id == user_id && kind.map_or(true, |k| c.kind == k))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Insert or update a category
    ///
    /// Fails with `Duplicate` when another category of the same user already
    /// has this name.
    pub fn upsert(&self, category: Category) -> Result<(), TallyError> {
        let mut categories = self.categories.write().map_err(lock_error)?;

        let clash = categories.values().any(|existing| {
            existing.id != category.id
                && existing.user_id == category.user_id
                && existing.name == category.name
        });
        if clash {
            return Err(TallyError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, TallyError> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        Ok(categories.remove(&id).is_some())
    }
}
