mod csv_file;
mod store;

pub use csv_file::CsvSink;
pub use store::StoreSink;

use crate::scraper::RawListing;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Store connection failed: {0}")]
    StoreConnect(String),
    #[error("Store write failed: {0}")]
    StoreWrite(String),
    #[error("File error: {0}")]
    File(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Interchange format error: {0}")]
    Format(String),
}

/// A durable destination for a scraped collection.
pub trait Sink {
    fn name(&self) -> &'static str;

    /// Persist `listings`, returning how many rows were written.
    fn write(&self, listings: &[RawListing]) -> Result<usize, SinkError>;
}

#[derive(Debug)]
pub struct SinkOutcome {
    pub sink: &'static str,
    pub result: Result<usize, SinkError>,
}

#[derive(Debug, Default)]
pub struct SinkReport {
    pub outcomes: Vec<SinkOutcome>,
}

impl SinkReport {
    pub fn outcome(&self, sink: &str) -> Option<&SinkOutcome> {
        self.outcomes.iter().find(|o| o.sink == sink)
    }

    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Runs each sink on its own; one failing never stops the next.
#[derive(Default)]
pub struct SinkAdapter {
    sinks: Vec<Box<dyn Sink>>,
}

impl SinkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn persist(&self, listings: &[RawListing]) -> SinkReport {
        let mut report = SinkReport::default();

        for sink in &self.sinks {
            let result = sink.write(listings);
            match &result {
                Ok(written) => info!(sink = sink.name(), written, "Sink finished"),
                Err(e) => error!(sink = sink.name(), error = %e, "Sink failed"),
            }
            report.outcomes.push(SinkOutcome {
                sink: sink.name(),
                result,
            });
        }

        report
    }
}
