// src/domain/normalize.rs

use crate::domain::listing::NormalizedListing;
use crate::scraper::RawListing;
use chrono::NaiveDate;

// Day-first formats the site uses for publication dates. The two-digit year
// goes first: `%Y` would happily read "24" as the year 24.
const DATE_FORMATS: [&str; 4] = ["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Share of the price distribution kept in the analytics view.
pub const OUTLIER_QUANTILE: f64 = 0.99;

/// Keep the decimal digits of `raw` and read them as a number.
///
/// `"1,200 DT"` becomes `1200`. Text with no digits (or too many to fit)
/// is unknown.
pub fn normalize_price(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse a day-before-month date. Impossible dates (31/02) are unknown.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

pub fn normalize_listing(raw: &RawListing) -> NormalizedListing {
    NormalizedListing {
        title: raw.title.clone(),
        price: normalize_price(&raw.price),
        property_type: raw.property_type.clone(),
        location: raw.location.clone(),
        publication_date: normalize_date(&raw.publication_date),
        link: raw.link.clone(),
    }
}

pub fn normalize_collection(raw: &[RawListing]) -> Vec<NormalizedListing> {
    raw.iter().map(normalize_listing).collect()
}

/// Quantile `q` (0..=1) of the known prices, linearly interpolated between
/// the two nearest order statistics.
pub fn price_quantile(rows: &[NormalizedListing], q: f64) -> Option<f64> {
    let mut prices: Vec<f64> = rows.iter().filter_map(|r| r.price).map(|p| p as f64).collect();
    quantile(&mut prices, q)
}

pub(crate) fn quantile(values: &mut [f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let q = q.clamp(0.0, 1.0);
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(values[lo] + (values[hi] - values[lo]) * frac)
}

/// Rows for charts and summaries: everything except prices above the
/// batch's 99th percentile. Rows with an unknown price stay.
///
/// Returns a fresh vector; the input (and the store) are untouched.
pub fn analytics_view(rows: &[NormalizedListing]) -> Vec<NormalizedListing> {
    let Some(cutoff) = price_quantile(rows, OUTLIER_QUANTILE) else {
        return rows.to_vec();
    };

    rows.iter()
        .filter(|r| r.price.map_or(true, |p| p as f64 <= cutoff))
        .cloned()
        .collect()
}
