use serde::{Deserialize, Serialize};

/// Placeholder stored in any field the markup didn't provide.
pub const MISSING_FIELD: &str = "N/A";

// One row of the results table, as surface text.
//
// Field order matters: it is the CSV header order and the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    pub price: String,
    pub property_type: String,
    pub location: String,
    pub publication_date: String,
    pub link: String,
}

impl RawListing {
    /// A listing where every lookup failed.
    pub fn missing() -> Self {
        Self {
            title: MISSING_FIELD.to_string(),
            price: MISSING_FIELD.to_string(),
            property_type: MISSING_FIELD.to_string(),
            location: MISSING_FIELD.to_string(),
            publication_date: MISSING_FIELD.to_string(),
            link: MISSING_FIELD.to_string(),
        }
    }
}

/// Listings accumulated over one scrape run, in page order.
#[derive(Debug, Default, Clone)]
pub struct ListingCollection {
    listings: Vec<RawListing>,
}

impl ListingCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_page(&mut self, page: Vec<RawListing>) {
        self.listings.extend(page);
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawListing> {
        self.listings.iter()
    }

    pub fn as_slice(&self) -> &[RawListing] {
        &self.listings
    }
}
