use crate::db::init_db;
use crate::router::{handle, parse_filter, AppState};
use crate::scraper::RawListing;
use crate::sink::{Sink, StoreSink};
use crate::templates::pages::format_price;
use crate::tests::utils::{read_body, test_config};
use astra::Body;
use http::{Method, Request};

fn listing(title: &str, location: &str, property_type: &str, price: &str) -> RawListing {
    RawListing {
        title: title.into(),
        price: price.into(),
        property_type: property_type.into(),
        location: location.into(),
        publication_date: "12/01/2024".into(),
        link: format!("/{title}"),
    }
}

// Two rows share the top price so the outlier cut keeps all of them.
fn dashboard_state() -> AppState {
    let state = AppState::new(test_config("http://127.0.0.1:1/?a=1"));
    init_db(&state.db).unwrap();
    StoreSink::new(state.db.clone())
        .write(&[
            listing("a", "Tunis", "Appartement", "200 000 DT"),
            listing("b", "Tunis", "Villa", "200,000 DT"),
            listing("c", "Sousse", "Appartement", "150 000 DT"),
            listing("d", "Sfax", "Terrain", "Prix à débattre"),
        ])
        .unwrap();
    state.cache.refresh().unwrap();
    state
}

fn get(state: &AppState, uri: &str) -> String {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, state).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);
    read_body(resp)
}

#[test]
fn dashboard_renders_summary_and_sections() {
    let state = dashboard_state();

    let body = get(&state, "/");

    assert!(body.contains("Tunisie Annonce Dashboard"));
    assert!(body.contains("Total Listings"));
    assert!(body.contains("Price Distribution (4 listings)"));
    assert!(body.contains("Property Types (Appartement most common)"));
    assert!(body.contains("Price Distribution by Location (Top 10)"));
    assert!(body.contains("Property Types by Location (Top 8)"));
    // every location is offered in the filter
    for loc in ["Tunis", "Sousse", "Sfax"] {
        assert!(body.contains(&format!("value=\"{loc}\"")), "missing {loc}");
    }
}

#[test]
fn dashboard_applies_location_filter() {
    let state = dashboard_state();

    let body = get(&state, "/?location=Tunis&property_type=all");

    assert!(body.contains("Price Distribution (2 listings)"));
    assert!(body.contains(&format_price(200_000.0)));
    assert!(body.contains("/export.xlsx?location=Tunis"));
}

#[test]
fn dashboard_with_empty_store_shows_placeholders() {
    let state = AppState::new(test_config("http://127.0.0.1:1/?a=1"));
    init_db(&state.db).unwrap();
    state.cache.refresh().unwrap();

    let body = get(&state, "/");

    assert!(body.contains("Price Distribution (0 listings)"));
    assert!(body.contains("No price data available"));
}

#[test]
fn filter_parsing_treats_all_and_empty_as_unset() {
    let f = parse_filter("location=all&property_type=");
    assert_eq!(f.location, None);
    assert_eq!(f.property_type, None);

    let f = parse_filter("location=La+Marsa&property_type=Villa&x=1");
    assert_eq!(f.location.as_deref(), Some("La Marsa"));
    assert_eq!(f.property_type.as_deref(), Some("Villa"));
}

#[test]
fn prices_are_grouped_in_thousands() {
    assert_eq!(format_price(1_234_567.8), "1,234,568 DT");
    assert_eq!(format_price(950.0), "950 DT");
}
