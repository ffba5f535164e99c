pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod pagination;
mod scraper_error;

pub use fetcher::{FetchOutcome, PageFetcher, PageSource};
pub use models::{ListingCollection, RawListing, MISSING_FIELD};
pub use pagination::{BaseQuery, PaginationDriver, Termination};
pub use scraper_error::ScraperError;
