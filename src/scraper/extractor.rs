use crate::scraper::models::{RawListing, MISSING_FIELD};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Cells per listing row in the results table. Other rows (headers,
/// separators, ads) have a different count and are skipped.
pub const EXPECTED_COLUMNS: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    PropertyType,
    Location,
    PublicationDate,
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    /// Trimmed text of the cell.
    Text,
    /// Trimmed text of the first anchor in the cell.
    AnchorText,
    /// `href` of the first anchor in the cell.
    AnchorHref,
}

// Column layout of the site's results table. Edit here if the markup moves.
pub const FIELD_COLUMNS: [(Field, usize, CellValue); 6] = [
    (Field::Title, 7, CellValue::AnchorText),
    (Field::Price, 9, CellValue::Text),
    (Field::PropertyType, 5, CellValue::Text),
    (Field::Location, 1, CellValue::AnchorText),
    (Field::PublicationDate, 11, CellValue::Text),
    (Field::Link, 7, CellValue::AnchorHref),
];

struct Selectors {
    row: Selector,
    cell: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            row: Selector::parse("tr").ok()?,
            cell: Selector::parse("td").ok()?,
            anchor: Selector::parse("a").ok()?,
        })
    }
}

/// Parse one results page into listings, in document order.
pub fn extract_listings(html: &str) -> Vec<RawListing> {
    let Some(selectors) = Selectors::new() else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for row in document.select(&selectors.row) {
        let cells: Vec<ElementRef> = row.select(&selectors.cell).collect();
        if cells.len() != EXPECTED_COLUMNS {
            debug!(columns = cells.len(), "Skipping non-listing row");
            continue;
        }
        listings.push(listing_from_cells(&cells, &selectors.anchor));
    }

    listings
}

fn listing_from_cells(cells: &[ElementRef], anchor: &Selector) -> RawListing {
    let mut listing = RawListing::missing();

    for (field, column, value) in FIELD_COLUMNS {
        let extracted = cells
            .get(column)
            .and_then(|cell| cell_value(cell, value, anchor))
            .unwrap_or_else(|| MISSING_FIELD.to_string());

        let slot = match field {
            Field::Title => &mut listing.title,
            Field::Price => &mut listing.price,
            Field::PropertyType => &mut listing.property_type,
            Field::Location => &mut listing.location,
            Field::PublicationDate => &mut listing.publication_date,
            Field::Link => &mut listing.link,
        };
        *slot = extracted;
    }

    listing
}

fn cell_value(cell: &ElementRef, value: CellValue, anchor: &Selector) -> Option<String> {
    match value {
        CellValue::Text => non_empty(text_of(cell)),
        CellValue::AnchorText => {
            let a = cell.select(anchor).next()?;
            Some(text_of(&a))
        }
        CellValue::AnchorHref => {
            let a = cell.select(anchor).next()?;
            a.value().attr("href").map(|href| href.trim().to_string())
        }
    }
}

fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
