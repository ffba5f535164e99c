use chrono::NaiveDate;
use serde::Serialize;

/// A listing with typed price and date, derived from a `RawListing`.
///
/// `None` means the raw text could not be interpreted; it is never
/// coerced to zero or a default date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedListing {
    pub title: String,
    pub price: Option<u64>,
    pub property_type: String,
    pub location: String,
    pub publication_date: Option<NaiveDate>,
    pub link: String,
}
