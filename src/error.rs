use thiserror::Error;

/// Errors that can occur while scraping or managing recipes
#[derive(Error, Debug)]
pub enum ImportError {
    /// Network failure while fetching the source page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The source page answered with a non-success status
    #[error("Failed to fetch {url}: HTTP {status}")]
    HttpStatus { status: u16, url: String },

    /// A structured-data block could not be used
    #[error("Failed to parse recipe: {0}")]
    ParseError(String),

    /// The submitted source URL is not an absolute http(s) URL
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),

    /// The owner already saved this source URL
    #[error("Recipe already saved for {0}")]
    DuplicateSource(String),

    /// No record with this id
    #[error("Recipe {0} not found")]
    NotFound(i64),

    /// A scrape of this record is already running
    #[error("Recipe {0} is already being scraped")]
    ScrapeInProgress(i64),

    /// The extraction task died before reporting a result
    #[error("Scrape task failed: {0}")]
    TaskFailed(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl From<url::ParseError> for ImportError {
    fn from(err: url::ParseError) -> Self {
        ImportError::InvalidUrl(err.to_string())
    }
}

impl ImportError {
    /// True for failures of the network fetch itself
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ImportError::FetchError(_) | ImportError::HttpStatus { .. }
        )
    }
}
