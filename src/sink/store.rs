use crate::db::connection::{ensure_schema, Database};
use crate::db::listings::insert_listings;
use crate::scraper::RawListing;
use crate::sink::{Sink, SinkError};

/// Writes listings into the `annonces` table, skipping rows already there.
pub struct StoreSink {
    db: Database,
}

impl StoreSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Sink for StoreSink {
    fn name(&self) -> &'static str {
        "store"
    }

    fn write(&self, listings: &[RawListing]) -> Result<usize, SinkError> {
        // One connection per invocation; dropped (closed) on every return path.
        let mut conn = self
            .db
            .open()
            .map_err(|e| SinkError::StoreConnect(e.to_string()))?;

        ensure_schema(&conn).map_err(|e| SinkError::StoreConnect(e.to_string()))?;

        insert_listings(&mut conn, listings).map_err(|e| SinkError::StoreWrite(e.to_string()))
    }
}
