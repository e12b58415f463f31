use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Outbound page fetching
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// Configuration for fetching source pages
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// User-Agent header; many recipe sites reject non-browser clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept header
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Maximum number of redirects to follow
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            timeout: default_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

// Default value functions
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    10
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPEBOX__ prefix
    /// 2. recipebox.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPEBOX__FETCH__TIMEOUT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipebox").required(false))
        // Use double underscore for nested: RECIPEBOX__FETCH__USER_AGENT
        .add_source(
            Environment::with_prefix("RECIPEBOX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
