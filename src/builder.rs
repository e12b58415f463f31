use std::time::Duration;

use log::{debug, info};
use url::Url;

use crate::config::FetchConfig;
use crate::extractors::extract_from_html;
use crate::fetchers::RequestFetcher;
use crate::{ImportError, ScrapedRecipe};

/// Fetches source pages and extracts recipes from them
pub struct RecipeScraper {
    fetcher: RequestFetcher,
}

impl RecipeScraper {
    /// Start configuring a scraper
    ///
    /// # Example
    /// ```
    /// use recipebox::RecipeScraper;
    /// use std::time::Duration;
    ///
    /// let scraper = RecipeScraper::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> RecipeScraperBuilder {
        RecipeScraperBuilder::default()
    }

    /// Fetch `source_url` and extract its recipe.
    ///
    /// # Errors
    /// Returns `ImportError::InvalidUrl` for anything but an absolute http(s)
    /// URL, and `ImportError::FetchError` / `ImportError::HttpStatus` when the
    /// page cannot be retrieved. Missing or malformed structured data is not
    /// an error.
    pub async fn scrape(&self, source_url: &str) -> Result<ScrapedRecipe, ImportError> {
        let url = validate_source_url(source_url)?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        let recipe = extract_from_html(&html, &url);
        info!(
            "Scraped '{}' from {} ({} ingredients, {} steps)",
            recipe.title,
            recipe.source_host,
            recipe.ingredients.as_ref().map_or(0, Vec::len),
            recipe.instructions.as_ref().map_or(0, Vec::len)
        );
        Ok(recipe)
    }
}

/// Parse a submitted source URL, accepting only absolute http(s) URLs with a host.
pub fn validate_source_url(source_url: &str) -> Result<Url, ImportError> {
    let url = Url::parse(source_url.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ImportError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ImportError::InvalidUrl(format!("{source_url} has no host")));
    }
    Ok(url)
}

/// Builder for a configured [`RecipeScraper`]
#[derive(Debug, Default)]
pub struct RecipeScraperBuilder {
    config: Option<FetchConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    accept_language: Option<String>,
    max_redirects: Option<usize>,
}

impl RecipeScraperBuilder {
    /// Start from a loaded fetch configuration
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the Accept-Language header
    pub fn accept_language(mut self, language: impl Into<String>) -> Self {
        self.accept_language = Some(language.into());
        self
    }

    /// Limit the number of redirects followed
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Build the scraper
    ///
    /// # Errors
    /// Returns `ImportError::BuilderError` for a zero timeout and
    /// `ImportError::HeaderError` for header values that are not valid HTTP.
    pub fn build(self) -> Result<RecipeScraper, ImportError> {
        let config = self.fetch_config()?;

        debug!("Building scraper with {:?}", config);
        Ok(RecipeScraper {
            fetcher: RequestFetcher::new(&config)?,
        })
    }

    /// Resolve the overrides against the base configuration
    fn fetch_config(self) -> Result<FetchConfig, ImportError> {
        let mut config = self.config.unwrap_or_default();

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(ImportError::BuilderError(
                    "Timeout must be greater than zero".to_string(),
                ));
            }
            // Whole seconds, rounded up
            config.timeout = timeout.as_secs_f64().ceil() as u64;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        if let Some(language) = self.accept_language {
            config.accept_language = language;
        }
        if let Some(max) = self.max_redirects {
            config.max_redirects = max;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("https://example.com/recipe").is_ok());
        assert!(validate_source_url("  http://example.com/r?id=1 ").is_ok());
        assert!(matches!(
            validate_source_url("not a url"),
            Err(ImportError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_source_url("ftp://example.com/recipe"),
            Err(ImportError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_source_url("/relative/path"),
            Err(ImportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = RecipeScraper::builder().timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(ImportError::BuilderError(_))));
    }

    #[test]
    fn test_builder_rounds_timeout_up() {
        let config = |timeout: Duration| {
            RecipeScraper::builder()
                .timeout(timeout)
                .fetch_config()
                .unwrap()
                .timeout
        };
        assert_eq!(config(Duration::from_millis(300)), 1);
        assert_eq!(config(Duration::from_millis(1900)), 2);
        assert_eq!(config(Duration::from_secs(5)), 5);
    }

    #[test]
    fn test_builder_overrides_loaded_config() {
        let base = FetchConfig {
            timeout: 60,
            ..FetchConfig::default()
        };
        let config = RecipeScraper::builder()
            .config(base)
            .user_agent("RecipeBoxTest/1.0")
            .max_redirects(2)
            .fetch_config()
            .unwrap();

        assert_eq!(config.timeout, 60);
        assert_eq!(config.user_agent, "RecipeBoxTest/1.0");
        assert_eq!(config.max_redirects, 2);
    }

    #[test]
    fn test_builder_rejects_invalid_header() {
        let result = RecipeScraper::builder()
            .accept_language("en\nus")
            .build();
        assert!(matches!(result, Err(ImportError::HeaderError(_))));
    }

    #[test]
    fn test_builder_defaults() {
        assert!(RecipeScraper::builder().build().is_ok());
    }
}
