//! Recipe lifecycle: submit, background scrape, re-scrape, delete.

use std::collections::HashSet;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::builder::{validate_source_url, RecipeScraper};
use crate::error::ImportError;
use crate::model::{NewRecipe, Recipe, RecipePatch};
use crate::store::RecipeStore;

/// Handle on the background scrape started by [`RecipeBox::submit`].
///
/// Dropping it detaches the task; the record is still updated when the
/// scrape finishes.
pub struct ScrapeTask {
    id: i64,
    handle: JoinHandle<Result<Recipe, ImportError>>,
}

impl ScrapeTask {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the scrape and return the record in its final state.
    pub async fn wait(self) -> Result<Recipe, ImportError> {
        self.handle
            .await
            .map_err(|e| ImportError::TaskFailed(e.to_string()))?
    }
}

/// Ids of records with a scrape currently running
type InFlight = Arc<Mutex<HashSet<i64>>>;

/// A user's saved recipes backed by a [`RecipeStore`]
///
/// At most one scrape runs per record at a time.
pub struct RecipeBox<S: RecipeStore + 'static> {
    store: Arc<S>,
    scraper: Arc<RecipeScraper>,
    in_flight: InFlight,
}

impl<S: RecipeStore + 'static> RecipeBox<S> {
    pub fn new(store: Arc<S>, scraper: RecipeScraper) -> Self {
        Self {
            store,
            scraper: Arc::new(scraper),
            in_flight: InFlight::default(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Save a link and start scraping it in the background.
    ///
    /// The URL is validated before anything is stored. The returned record is
    /// `pending`; the scrape moves it to `ok` or `error` later.
    pub async fn submit(
        &self,
        owner_id: i64,
        source_url: &str,
    ) -> Result<(Recipe, ScrapeTask), ImportError> {
        let url = validate_source_url(source_url)?;
        let recipe = self
            .store
            .create(NewRecipe {
                owner_id,
                source_url: url.to_string(),
                source_host: url.host_str().unwrap_or_default().to_string(),
            })
            .await?;
        info!("Saved recipe {} for {}", recipe.id, recipe.source_url);

        let id = recipe.id;
        self.in_flight.lock().await.insert(id);
        let handle = tokio::spawn(run_scrape(
            Arc::clone(&self.store),
            Arc::clone(&self.scraper),
            Arc::clone(&self.in_flight),
            id,
            recipe.source_url.clone(),
        ));

        Ok((recipe, ScrapeTask { id, handle }))
    }

    /// Scrape an existing record again and wait for the outcome.
    ///
    /// A failed re-scrape records the error but keeps the previously
    /// scraped fields. Fails with `ScrapeInProgress` while an earlier scrape
    /// of the same record is still running. The scrape is not cancelled if
    /// the caller stops waiting.
    pub async fn rescrape(&self, id: i64) -> Result<Recipe, ImportError> {
        if !self.in_flight.lock().await.insert(id) {
            return Err(ImportError::ScrapeInProgress(id));
        }

        let handle = tokio::spawn(rerun_scrape(
            Arc::clone(&self.store),
            Arc::clone(&self.scraper),
            Arc::clone(&self.in_flight),
            id,
        ));
        ScrapeTask { id, handle }.wait().await
    }

    /// Whether a scrape of record `id` is currently running
    pub async fn is_scraping(&self, id: i64) -> bool {
        self.in_flight.lock().await.contains(&id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Recipe>, ImportError> {
        self.store.get(id).await
    }

    pub async fn list(&self, owner_id: i64) -> Result<Vec<Recipe>, ImportError> {
        self.store.list(owner_id).await
    }

    pub async fn update_notes(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Recipe, ImportError> {
        let notes = notes.filter(|n| !n.trim().is_empty());
        self.store
            .update(
                id,
                RecipePatch {
                    notes: Some(notes),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn set_tags(&self, id: i64, tags: Vec<String>) -> Result<Recipe, ImportError> {
        let mut tags: Vec<String> = tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.dedup();
        self.store
            .update(
                id,
                RecipePatch {
                    tags: Some(tags),
                    ..Default::default()
                },
            )
            .await
    }

    /// Delete a record for good.
    pub async fn delete(&self, id: i64) -> Result<(), ImportError> {
        if self.store.delete(id).await? {
            info!("Deleted recipe {}", id);
            Ok(())
        } else {
            Err(ImportError::NotFound(id))
        }
    }
}

/// Reset record `id` to `pending` and scrape its source again.
async fn rerun_scrape<S: RecipeStore + 'static>(
    store: Arc<S>,
    scraper: Arc<RecipeScraper>,
    in_flight: InFlight,
    id: i64,
) -> Result<Recipe, ImportError> {
    match store.update(id, RecipePatch::pending()).await {
        Ok(recipe) => run_scrape(store, scraper, in_flight, id, recipe.source_url).await,
        Err(e) => {
            in_flight.lock().await.remove(&id);
            Err(e)
        }
    }
}

/// Scrape `source_url` and record the outcome on record `id`.
///
/// The extraction runs in its own task; a panic there is turned into an
/// `error` status instead of leaving the record `pending`. The record leaves
/// the in-flight set once the outcome is stored.
async fn run_scrape<S: RecipeStore + 'static>(
    store: Arc<S>,
    scraper: Arc<RecipeScraper>,
    in_flight: InFlight,
    id: i64,
    source_url: String,
) -> Result<Recipe, ImportError> {
    let attempt = tokio::spawn(async move { scraper.scrape(&source_url).await });

    let patch = match attempt.await {
        Ok(Ok(scraped)) => RecipePatch::scraped(scraped),
        Ok(Err(e)) => {
            warn!("Scrape of recipe {} failed: {}", id, e);
            RecipePatch::failed(e.to_string())
        }
        Err(e) => {
            error!("Scrape task for recipe {} died: {}", id, e);
            RecipePatch::failed(ImportError::TaskFailed(e.to_string()).to_string())
        }
    };

    let updated = store.update(id, patch).await;
    in_flight.lock().await.remove(&id);
    updated
}
