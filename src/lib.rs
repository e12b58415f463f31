pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod service;
pub mod store;
pub mod text;
pub mod view;

use std::time::Duration;

// Re-export commonly used types
pub use builder::{RecipeScraper, RecipeScraperBuilder};
pub use error::ImportError;
pub use extractors::extract_from_html;
pub use model::{NewRecipe, Recipe, RecipePatch, ScrapeStatus, ScrapedRecipe, StoredLines};
pub use service::{RecipeBox, ScrapeTask};
pub use store::{MemoryStore, RecipeStore};
pub use text::{
    format_quantity, normalize_lines, parse_quantity, scale_leading_quantity,
    scale_servings_label, strip_leading_step_number,
};
pub use view::{render, RecipeView, ViewState};

/// Fetch a page and extract its recipe using the default configuration.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), recipebox::ImportError> {
/// let recipe = recipebox::scrape_recipe("https://example.com/recipe").await?;
/// println!("{}", recipe.title);
/// # Ok(())
/// # }
/// ```
pub async fn scrape_recipe(url: &str) -> Result<ScrapedRecipe, ImportError> {
    RecipeScraper::builder().build()?.scrape(url).await
}

/// Like [`scrape_recipe`] with a custom request timeout.
pub async fn scrape_recipe_with_timeout(
    url: &str,
    timeout: Duration,
) -> Result<ScrapedRecipe, ImportError> {
    RecipeScraper::builder()
        .timeout(timeout)
        .build()?
        .scrape(url)
        .await
}
