use thiserror::Error;

/// Errors that stop a scrape before it starts.
///
/// Page-level failures never show up here; they degrade to an empty page
/// (see `FetchOutcome`).
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Invalid base query '{url}': {reason}")]
    InvalidBaseQuery { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(String),
}
