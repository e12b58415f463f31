use crate::config::FetchConfig;
use crate::error::ImportError;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

/// Plain HTTP GET with browser-like headers.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, ImportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&config.accept_language)?);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page body. Any non-2xx final status is an error.
    pub async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        debug!("RequestFetcher: {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
