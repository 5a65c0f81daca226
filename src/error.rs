use thiserror::Error;

/// Errors from odds/probability conversion.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum OddsError {
    /// American odds of zero encode no price.
    #[error("invalid american odds: {0}")]
    InvalidOdds(i32),

    /// Probability outside the open interval (0, 1).
    #[error("invalid probability: {0} (must be in (0, 1) exclusive)")]
    InvalidProbability(f64),
}

/// Unified error type for the feed pipeline.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Odds API returned a failure status.
    #[error("odds api error: {message} (status {status})")]
    Upstream { status: u16, message: String },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Odds conversion error.
    #[error("odds error: {0}")]
    Odds(#[from] OddsError),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, FeedError>;
