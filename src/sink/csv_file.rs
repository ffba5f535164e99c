use crate::scraper::RawListing;
use crate::sink::{Sink, SinkError};
use crate::spreadsheets::write_interchange_file;
use std::path::PathBuf;

pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write(&self, listings: &[RawListing]) -> Result<usize, SinkError> {
        write_interchange_file(&self.path, listings)
    }
}
