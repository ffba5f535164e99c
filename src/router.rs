use crate::cache::ListingCache;
use crate::config::Config;
use crate::db::Database;
use crate::domain::analytics::{
    distinct_locations, distinct_property_types, price_by_location, price_histogram, summarize,
    type_distribution, types_by_location, ListingFilter, HISTOGRAM_BINS, TOP_PRICE_LOCATIONS,
    TOP_TYPE_LOCATIONS,
};
use crate::errors::ServerError;
use crate::pipeline::{scrape_with_config, PipelineReport};
use crate::responses::{html_response, json_response, redirect_response, ResultResp};
use crate::spreadsheets::export_listings_xlsx;
use crate::templates::pages::{dashboard_page, DashboardVm};
use astra::Request;
use serde::Serialize;
use std::sync::{Mutex, TryLockError};
use url::form_urlencoded;

/// Everything a request handler can reach.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub cache: ListingCache,
    // Held for the duration of a scrape: one writer at a time.
    pub(crate) scrape_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let db = Database::new(&config.database_path);
        let cache = ListingCache::new(db.clone());
        Self {
            config,
            db,
            cache,
            scrape_lock: Mutex::new(()),
        }
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let query = req.uri().query().unwrap_or("");

    match (method, path) {
        ("GET", "/") => dashboard(state, parse_filter(query)),
        ("GET", "/annonces") => {
            let snapshot = state.cache.snapshot()?;
            json_response(200, &snapshot.raw)
        }
        ("GET", "/export.xlsx") => {
            let snapshot = state.cache.snapshot()?;
            let rows = parse_filter(query).apply(&snapshot.analytics);
            export_listings_xlsx(&rows)
        }
        ("POST", "/scrape") => scrape(state),
        ("POST", "/refresh") => {
            state.cache.refresh()?;
            redirect_response("/")
        }
        _ => Err(ServerError::NotFound),
    }
}

fn dashboard(state: &AppState, filter: ListingFilter) -> ResultResp {
    let snapshot = state.cache.snapshot()?;
    let rows = filter.apply(&snapshot.analytics);

    let vm = DashboardVm {
        locations: distinct_locations(&snapshot.analytics),
        property_types: distinct_property_types(&snapshot.analytics),
        summary: summarize(&rows),
        histogram: price_histogram(&rows, HISTOGRAM_BINS),
        type_distribution: type_distribution(&rows),
        price_by_location: price_by_location(&rows, TOP_PRICE_LOCATIONS),
        types_by_location: types_by_location(&rows, TOP_TYPE_LOCATIONS),
        refreshed_at: snapshot.refreshed_at,
        export_href: export_href(&filter),
        filter,
    };

    html_response(dashboard_page(&vm))
}

#[derive(Serialize)]
struct SinkStatus {
    sink: &'static str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ScrapeResponse {
    message: &'static str,
    pages_fetched: u32,
    failed_pages: u32,
    listings: usize,
    sinks: Vec<SinkStatus>,
}

impl From<&PipelineReport> for ScrapeResponse {
    fn from(report: &PipelineReport) -> Self {
        let sinks = report
            .sinks
            .outcomes
            .iter()
            .map(|o| match &o.result {
                Ok(n) => SinkStatus {
                    sink: o.sink,
                    ok: true,
                    written: Some(*n),
                    error: None,
                },
                Err(e) => SinkStatus {
                    sink: o.sink,
                    ok: false,
                    written: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        Self {
            message: "Scraping completed",
            pages_fetched: report.pages_fetched,
            failed_pages: report.failed_pages,
            listings: report.listings.len(),
            sinks,
        }
    }
}

fn scrape(state: &AppState) -> ResultResp {
    let _guard = match state.scrape_lock.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::WouldBlock) => {
            return Err(ServerError::Conflict("a scrape is already running".into()))
        }
        Err(TryLockError::Poisoned(_)) => return Err(ServerError::InternalError),
    };

    let report =
        scrape_with_config(&state.config).map_err(|e| ServerError::ScrapeError(e.to_string()))?;

    // New rows are only visible after the cache reloads.
    state.cache.refresh()?;

    json_response(200, &ScrapeResponse::from(&report))
}

/// `?location=..&property_type=..`; missing, empty or `all` means no filter.
pub fn parse_filter(query: &str) -> ListingFilter {
    let mut filter = ListingFilter::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.trim();
        if value.is_empty() || value == "all" {
            continue;
        }
        match key.as_ref() {
            "location" => filter.location = Some(value.to_string()),
            "property_type" => filter.property_type = Some(value.to_string()),
            _ => {}
        }
    }

    filter
}

fn export_href(filter: &ListingFilter) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    if let Some(loc) = &filter.location {
        ser.append_pair("location", loc);
    }
    if let Some(t) = &filter.property_type {
        ser.append_pair("property_type", t);
    }

    let qs = ser.finish();
    if qs.is_empty() {
        "/export.xlsx".to_string()
    } else {
        format!("/export.xlsx?{qs}")
    }
}
