use crate::db::init_db;
use crate::responses::error_to_response;
use crate::responses::xlsx::XLSX_CONTENT_TYPE;
use crate::router::{handle, AppState};
use crate::scraper::RawListing;
use crate::sink::{Sink, StoreSink};
use crate::tests::utils::{page_html, read_body, sample_row, serve_pages, test_config};
use astra::Body;
use http::{Method, Request};
use std::io::Read;

fn seeded_state(base_url: &str, listings: &[RawListing]) -> AppState {
    let state = AppState::new(test_config(base_url));
    init_db(&state.db).unwrap();
    StoreSink::new(state.db.clone()).write(listings).unwrap();
    state
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn listing(n: usize) -> RawListing {
    RawListing {
        title: format!("Villa {n}"),
        price: "1,200 DT".into(),
        property_type: "Villa".into(),
        location: "Nabeul".into(),
        publication_date: "01/02/2024".into(),
        link: format!("/villa/{n}"),
    }
}

#[test]
fn annonces_returns_raw_rows_after_refresh() {
    let state = seeded_state("http://127.0.0.1:1/?a=1", &[listing(1), listing(2)]);
    state.cache.refresh().unwrap();

    let resp = handle(request(Method::GET, "/annonces"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let rows: Vec<RawListing> = serde_json::from_str(&read_body(resp)).unwrap();
    assert_eq!(rows, vec![listing(1), listing(2)]);
}

#[test]
fn annonces_keep_raw_text_and_field_names() {
    let state = seeded_state("http://127.0.0.1:1/?a=1", &[listing(1)]);
    state.cache.refresh().unwrap();

    let body = read_body(handle(request(Method::GET, "/annonces"), &state).unwrap());
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json[0]["price"], "1,200 DT");
    assert_eq!(json[0]["property_type"], "Villa");
    assert_eq!(json[0]["publication_date"], "01/02/2024");
}

#[test]
fn cache_is_stale_until_refreshed() {
    let state = seeded_state("http://127.0.0.1:1/?a=1", &[listing(1)]);
    state.cache.refresh().unwrap();

    StoreSink::new(state.db.clone()).write(&[listing(2)]).unwrap();
    let before: Vec<RawListing> = serde_json::from_str(&read_body(
        handle(request(Method::GET, "/annonces"), &state).unwrap(),
    ))
    .unwrap();
    assert_eq!(before.len(), 1);

    let resp = handle(request(Method::POST, "/refresh"), &state).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["Location"], "/");

    let after: Vec<RawListing> = serde_json::from_str(&read_body(
        handle(request(Method::GET, "/annonces"), &state).unwrap(),
    ))
    .unwrap();
    assert_eq!(after.len(), 2);
}

#[test]
fn unknown_route_is_not_found() {
    let state = seeded_state("http://127.0.0.1:1/?a=1", &[]);

    let err = handle(request(Method::GET, "/nope"), &state).unwrap_err();
    let resp = error_to_response(err);

    assert_eq!(resp.status(), 404);
}

#[test]
fn export_returns_a_workbook() {
    let state = seeded_state("http://127.0.0.1:1/?a=1", &[listing(1), listing(2)]);
    state.cache.refresh().unwrap();

    let resp = handle(request(Method::GET, "/export.xlsx?location=Nabeul"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["Content-Type"], XLSX_CONTENT_TYPE);
    assert_eq!(resp.headers()["Cache-Control"], "no-store");
    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    // xlsx is a zip archive
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn scrape_endpoint_runs_pipeline_and_refreshes_cache() {
    let site = serve_pages(vec![(1, 200, page_html(&[sample_row(1), sample_row(2)]))]);
    let state = seeded_state(&site.base_url, &[]);

    let resp = handle(request(Method::POST, "/scrape"), &state).unwrap();
    assert_eq!(resp.status(), 200);

    let json: serde_json::Value = serde_json::from_str(&read_body(resp)).unwrap();
    assert_eq!(json["message"], "Scraping completed");
    assert_eq!(json["listings"], 2);
    assert_eq!(json["sinks"][0]["sink"], "store");
    assert_eq!(json["sinks"][0]["ok"], true);
    assert_eq!(json["sinks"][0]["written"], 2);

    // visible without an explicit refresh
    let rows: Vec<RawListing> = serde_json::from_str(&read_body(
        handle(request(Method::GET, "/annonces"), &state).unwrap(),
    ))
    .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn scrape_with_bad_base_url_is_an_error() {
    let state = seeded_state("ftp://example.com/listings", &[]);

    let err = handle(request(Method::POST, "/scrape"), &state).unwrap_err();

    assert_eq!(err.status(), 500);
}

#[test]
fn scrape_while_another_runs_is_conflict() {
    let site = serve_pages(vec![(1, 200, page_html(&[sample_row(1)]))]);
    let state = seeded_state(&site.base_url, &[]);

    let running = state.scrape_lock.lock().unwrap();
    let err = handle(request(Method::POST, "/scrape"), &state).unwrap_err();
    drop(running);

    assert_eq!(error_to_response(err).status(), 409);
    // the rejected request never reached the site
    assert!(site.requests.lock().unwrap().is_empty());

    // once the first scrape is done, the next one goes through
    let resp = handle(request(Method::POST, "/scrape"), &state).unwrap();
    assert_eq!(resp.status(), 200);
}
