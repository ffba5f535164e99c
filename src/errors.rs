// errors.rs
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, scraper).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Scrape Error: {0}")]
    ScrapeError(String),
    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::Conflict(_) => 409,
            ServerError::DbError(_)
            | ServerError::ScrapeError(_)
            | ServerError::XlsxError(_)
            | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
