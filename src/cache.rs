// cache.rs
use crate::db::{get_all_listings, Database};
use crate::domain::listing::NormalizedListing;
use crate::domain::normalize::{analytics_view, normalize_collection};
use crate::errors::ServerError;
use crate::scraper::RawListing;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::info;

/// One loaded copy of the store, with its derived views.
#[derive(Debug, Default)]
pub struct CacheSnapshot {
    pub raw: Vec<RawListing>,
    /// Normalized rows minus price outliers; feeds the dashboard and export.
    pub analytics: Vec<NormalizedListing>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    pub fn build(raw: Vec<RawListing>, refreshed_at: DateTime<Utc>) -> Self {
        let normalized = normalize_collection(&raw);
        let analytics = analytics_view(&normalized);
        Self {
            raw,
            analytics,
            refreshed_at: Some(refreshed_at),
        }
    }
}

/// The stored collection as served by the API and dashboard.
///
/// Contents only change on `refresh`.
pub struct ListingCache {
    db: Database,
    current: RwLock<Arc<CacheSnapshot>>,
}

impl ListingCache {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            current: RwLock::new(Arc::new(CacheSnapshot::default())),
        }
    }

    /// Reload from the store. The old snapshot stays visible until the new
    /// one is fully built.
    pub fn refresh(&self) -> Result<usize, ServerError> {
        let raw = get_all_listings(&self.db)?;
        let snapshot = Arc::new(CacheSnapshot::build(raw, Utc::now()));
        let count = snapshot.raw.len();

        let mut slot = self.current.write().map_err(|_| ServerError::InternalError)?;
        *slot = snapshot;

        info!(listings = count, "Listing cache refreshed");
        Ok(count)
    }

    pub fn snapshot(&self) -> Result<Arc<CacheSnapshot>, ServerError> {
        let slot = self.current.read().map_err(|_| ServerError::InternalError)?;
        Ok(Arc::clone(&slot))
    }
}
