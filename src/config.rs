use std::env;
use std::time::Duration;

use crate::error::FeedError;

/// Default base URL for The Odds API.
pub const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";

/// Per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for The Odds API client.
///
/// Built once from the environment and passed to the client at construction,
/// no module-global API key.
#[derive(Debug, Clone)]
pub struct OddsApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OddsApiConfig {
    /// Load configuration from environment variables.
    ///
    /// `THE_ODDS_API_KEY` is required. `THE_ODDS_API_BASE_URL` may override the
    /// default endpoint (useful for tests against a local stub).
    pub fn from_env() -> Result<Self, FeedError> {
        let api_key = env::var("THE_ODDS_API_KEY")
            .map_err(|_| FeedError::Config("THE_ODDS_API_KEY environment variable not set".to_string()))?;

        let base_url = env::var("THE_ODDS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}
