// pipeline.rs
use crate::config::Config;
use crate::db::Database;
use crate::scraper::{
    BaseQuery, ListingCollection, PageFetcher, PageSource, PaginationDriver, ScraperError,
};
use crate::sink::{CsvSink, SinkAdapter, SinkReport, StoreSink};
use tracing::info;

#[derive(Debug)]
pub struct PipelineReport {
    pub pages_fetched: u32,
    pub failed_pages: u32,
    pub listings: ListingCollection,
    pub sinks: SinkReport,
}

pub fn build_sinks(cfg: &Config) -> SinkAdapter {
    let mut sinks = SinkAdapter::new();
    if cfg.write_store {
        sinks = sinks.with_sink(Box::new(StoreSink::new(Database::new(&cfg.database_path))));
    }
    if cfg.write_csv {
        sinks = sinks.with_sink(Box::new(CsvSink::new(&cfg.csv_path)));
    }
    sinks
}

/// Scrape over the network using the settings in `cfg`.
///
/// The base query is checked before the HTTP client exists, so a bad URL
/// never reaches the network.
pub fn scrape_with_config(cfg: &Config) -> Result<PipelineReport, ScraperError> {
    let query = BaseQuery::parse(&cfg.base_url)?;
    let fetcher = PageFetcher::new(cfg.fetch_timeout)?;
    Ok(run_pipeline(cfg, query, &fetcher))
}

/// Drive every page, then hand the collection to the configured sinks.
pub fn run_pipeline(cfg: &Config, query: BaseQuery, source: &dyn PageSource) -> PipelineReport {
    info!(base_url = query.as_str(), termination = ?cfg.termination(), "Starting scrape");

    let driver = PaginationDriver::new(source, query, cfg.termination(), cfg.page_delay);
    let run = driver.run();

    let sinks = build_sinks(cfg).persist(run.listings.as_slice());

    info!(
        pages = run.pages_fetched,
        listings = run.listings.len(),
        sinks_ok = sinks.all_ok(),
        "Scrape complete"
    );

    PipelineReport {
        pages_fetched: run.pages_fetched,
        failed_pages: run.failed_pages,
        listings: run.listings,
        sinks,
    }
}
