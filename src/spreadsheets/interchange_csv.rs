// spreadsheets/interchange_csv.rs
use crate::scraper::RawListing;
use crate::sink::SinkError;
use std::path::Path;

pub const CSV_HEADER: [&str; 6] = [
    "title",
    "price",
    "property_type",
    "location",
    "publication_date",
    "link",
];

/// Write the whole collection, header first, replacing any previous file.
pub fn write_interchange_file(path: &Path, listings: &[RawListing]) -> Result<usize, SinkError> {
    // Header is written by hand so an empty run still yields a valid file.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(CSV_HEADER)?;
    for listing in listings {
        wtr.serialize(listing)?;
    }
    wtr.flush()?;

    Ok(listings.len())
}

/// Read a file produced by `write_interchange_file`. Every field comes back
/// as the exact text that was written.
pub fn read_interchange_file(path: &Path) -> Result<Vec<RawListing>, SinkError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = rdr.headers()?.clone();
    if headers.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(SinkError::Format(format!(
            "unexpected header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let mut out = Vec::new();
    for record in rdr.deserialize() {
        out.push(record?);
    }
    Ok(out)
}
