use crate::scraper::fetcher::PageSource;
use crate::scraper::models::ListingCollection;
use crate::scraper::ScraperError;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Query key carrying the page number on the listing search URL.
pub const PAGE_PARAM: &str = "rech_page_num";

/// Search URL with every filter fixed except the page number.
#[derive(Debug, Clone)]
pub struct BaseQuery {
    url: Url,
}

impl BaseQuery {
    pub fn parse(raw: &str) -> Result<Self, ScraperError> {
        let invalid = |reason: &str| ScraperError::InvalidBaseQuery {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host"));
        }
        if url.query_pairs().any(|(k, _)| k == PAGE_PARAM) {
            return Err(invalid("page parameter is set by the driver"));
        }

        Ok(Self { url })
    }

    pub fn page_url(&self, page: u32) -> String {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(PAGE_PARAM, &page.to_string());
        url.to_string()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// When the driver stops asking for more pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Fetch exactly this many pages, whatever they contain.
    Bounded { pages: u32 },
    /// Keep going until a page yields no listings.
    UntilEmpty,
}

impl Termination {
    pub fn from_max_pages(max_pages: Option<u32>) -> Self {
        match max_pages {
            Some(pages) => Termination::Bounded { pages },
            None => Termination::UntilEmpty,
        }
    }
}

#[derive(Debug)]
pub struct ScrapeRun {
    pub listings: ListingCollection,
    pub pages_fetched: u32,
    pub failed_pages: u32,
}

pub struct PaginationDriver<'a> {
    source: &'a dyn PageSource,
    query: BaseQuery,
    termination: Termination,
    page_delay: Duration,
}

impl<'a> PaginationDriver<'a> {
    pub fn new(
        source: &'a dyn PageSource,
        query: BaseQuery,
        termination: Termination,
        page_delay: Duration,
    ) -> Self {
        Self {
            source,
            query,
            termination,
            page_delay,
        }
    }

    pub fn run(&self) -> ScrapeRun {
        let mut run = ScrapeRun {
            listings: ListingCollection::new(),
            pages_fetched: 0,
            failed_pages: 0,
        };
        let mut page: u32 = 1;

        loop {
            if let Termination::Bounded { pages } = self.termination {
                if page > pages {
                    break;
                }
            }

            // Politeness delay between fetches, never before the first one.
            if page > 1 {
                std::thread::sleep(self.page_delay);
            }

            let url = self.query.page_url(page);
            info!(page, "Scraping page");

            let outcome = self.source.fetch_page(&url);
            run.pages_fetched += 1;
            if outcome.is_failure() {
                run.failed_pages += 1;
            }

            let listings = outcome.into_listings(&url);
            let found = listings.len();

            if found == 0 && self.termination == Termination::UntilEmpty {
                info!(page, "No more listings found, stopping");
                break;
            }

            info!(page, found, "Page parsed");
            run.listings.extend_page(listings);
            page += 1;
        }

        info!(
            pages = run.pages_fetched,
            failed = run.failed_pages,
            listings = run.listings.len(),
            "Pagination finished"
        );
        run
    }
}
