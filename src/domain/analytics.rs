// src/domain/analytics.rs

use crate::domain::listing::NormalizedListing;
use crate::domain::normalize::quantile;
use std::collections::HashMap;

pub const HISTOGRAM_BINS: usize = 30;
pub const TOP_PRICE_LOCATIONS: usize = 10;
pub const TOP_TYPE_LOCATIONS: usize = 8;

/// Dashboard filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub location: Option<String>,
    pub property_type: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, row: &NormalizedListing) -> bool {
        self.location.as_deref().map_or(true, |l| row.location == l)
            && self
                .property_type
                .as_deref()
                .map_or(true, |t| row.property_type == t)
    }

    pub fn apply(&self, rows: &[NormalizedListing]) -> Vec<NormalizedListing> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub average_price: Option<f64>,
    pub most_common_type: Option<String>,
    pub top_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Five-number summary of prices in one location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPriceStats {
    pub location: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationTypeCounts {
    pub location: String,
    pub counts: Vec<(String, usize)>,
}

pub fn summarize(rows: &[NormalizedListing]) -> Summary {
    let prices: Vec<f64> = known_prices(rows);
    let average_price = if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    };

    Summary {
        total: rows.len(),
        average_price,
        most_common_type: mode(rows.iter().map(|r| r.property_type.as_str())),
        top_location: mode(rows.iter().map(|r| r.location.as_str())),
    }
}

/// Equal-width bins spanning the known prices.
pub fn price_histogram(rows: &[NormalizedListing], bins: usize) -> Vec<HistogramBin> {
    let prices = known_prices(rows);
    if prices.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: prices.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for p in prices {
        let idx = (((p - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Listing count per property type, most frequent first.
pub fn type_distribution(rows: &[NormalizedListing]) -> Vec<(String, usize)> {
    counts_desc(rows.iter().map(|r| r.property_type.as_str()))
}

pub fn price_by_location(rows: &[NormalizedListing], top: usize) -> Vec<LocationPriceStats> {
    let locations = counts_desc(rows.iter().map(|r| r.location.as_str()));

    locations
        .into_iter()
        .take(top)
        .filter_map(|(location, count)| {
            let mut prices: Vec<f64> = rows
                .iter()
                .filter(|r| r.location == location)
                .filter_map(|r| r.price)
                .map(|p| p as f64)
                .collect();

            let min = quantile(&mut prices, 0.0)?;
            Some(LocationPriceStats {
                q1: quantile(&mut prices, 0.25)?,
                median: quantile(&mut prices, 0.5)?,
                q3: quantile(&mut prices, 0.75)?,
                max: quantile(&mut prices, 1.0)?,
                min,
                location,
                count,
            })
        })
        .collect()
}

pub fn types_by_location(rows: &[NormalizedListing], top: usize) -> Vec<LocationTypeCounts> {
    let locations = counts_desc(rows.iter().map(|r| r.location.as_str()));

    locations
        .into_iter()
        .take(top)
        .map(|(location, _)| {
            let counts = counts_desc(
                rows.iter()
                    .filter(|r| r.location == location)
                    .map(|r| r.property_type.as_str()),
            );
            LocationTypeCounts { location, counts }
        })
        .collect()
}

pub fn distinct_locations(rows: &[NormalizedListing]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.location.as_str()))
}

pub fn distinct_property_types(rows: &[NormalizedListing]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.property_type.as_str()))
}

fn known_prices(rows: &[NormalizedListing]) -> Vec<f64> {
    rows.iter().filter_map(|r| r.price).map(|p| p as f64).collect()
}

// Counts in descending order; ties keep first-seen order.
fn counts_desc<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for v in values {
        let c = counts.entry(v).or_insert(0);
        if *c == 0 {
            order.push(v);
        }
        *c += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|v| (v.to_string(), counts[v]))
        .collect();
    // stable sort keeps first-seen order among equal counts
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Most frequent value; ties go to the value that sorts first.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let counts = counts_desc(values);
    let top = counts.first()?.1;
    counts
        .into_iter()
        .take_while(|(_, c)| *c == top)
        .map(|(v, _)| v)
        .min()
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = counts_desc(values).into_iter().map(|(v, _)| v).collect();
    out.sort();
    out
}
