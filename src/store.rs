//! Record storage seam.
//!
//! The service only needs keyed CRUD with a per-owner uniqueness rule on the
//! source URL; `MemoryStore` is the in-process implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::RwLock;

use crate::error::ImportError;
use crate::model::{NewRecipe, Recipe, RecipePatch, ScrapeStatus};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert a `pending` record. Fails with `DuplicateSource` when the owner
    /// already saved this URL.
    async fn create(&self, new: NewRecipe) -> Result<Recipe, ImportError>;

    async fn get(&self, id: i64) -> Result<Option<Recipe>, ImportError>;

    /// All records of one owner, oldest first
    async fn list(&self, owner_id: i64) -> Result<Vec<Recipe>, ImportError>;

    /// Apply a partial update and return the updated record
    async fn update(&self, id: i64, patch: RecipePatch) -> Result<Recipe, ImportError>;

    /// Remove a record; returns whether it existed
    async fn delete(&self, id: i64) -> Result<bool, ImportError>;
}

#[derive(Default)]
struct Records {
    next_id: i64,
    by_id: BTreeMap<i64, Recipe>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn create(&self, new: NewRecipe) -> Result<Recipe, ImportError> {
        let mut records = self.records.write().await;

        let duplicate = records
            .by_id
            .values()
            .any(|r| r.owner_id == new.owner_id && r.source_url == new.source_url);
        if duplicate {
            return Err(ImportError::DuplicateSource(new.source_url));
        }

        records.next_id += 1;
        let id = records.next_id;
        let now = Utc::now();
        let recipe = Recipe {
            id,
            owner_id: new.owner_id,
            source_url: new.source_url,
            title: new.source_host.clone(),
            description: None,
            image_url: None,
            servings: None,
            servings_text: None,
            ingredients: None,
            instructions: None,
            source_host: new.source_host,
            scrape_status: ScrapeStatus::Pending,
            scrape_error: None,
            last_scraped_at: None,
            notes: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        records.by_id.insert(id, recipe.clone());
        debug!("MemoryStore: created recipe {}", id);
        Ok(recipe)
    }

    async fn get(&self, id: i64) -> Result<Option<Recipe>, ImportError> {
        Ok(self.records.read().await.by_id.get(&id).cloned())
    }

    async fn list(&self, owner_id: i64) -> Result<Vec<Recipe>, ImportError> {
        Ok(self
            .records
            .read()
            .await
            .by_id
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i64, patch: RecipePatch) -> Result<Recipe, ImportError> {
        let mut records = self.records.write().await;
        let recipe = records
            .by_id
            .get_mut(&id)
            .ok_or(ImportError::NotFound(id))?;
        recipe.apply(patch);
        Ok(recipe.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, ImportError> {
        Ok(self.records.write().await.by_id.remove(&id).is_some())
    }
}
