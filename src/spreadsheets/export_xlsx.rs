use crate::domain::listing::NormalizedListing;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 6] = [
    "Title",
    "Price (DT)",
    "Property Type",
    "Location",
    "Published",
    "Link",
];

/// Analytics rows as a workbook. Unknown prices and dates are left blank.
pub fn listings_workbook(rows: &[NormalizedListing]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, listing) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &listing.title)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write title: {}", e)))?;

        if let Some(price) = listing.price {
            worksheet
                .write_number(r, 1, price as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write price: {}", e)))?;
        }

        worksheet
            .write_string(r, 2, &listing.property_type)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write type: {}", e)))?;

        worksheet
            .write_string(r, 3, &listing.location)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write location: {}", e)))?;

        if let Some(date) = listing.publication_date {
            worksheet
                .write_date_with_format(r, 4, &date, &date_format)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write date: {}", e)))?;
        }

        worksheet
            .write_string(r, 5, &listing.link)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write link: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_listings_xlsx(rows: &[NormalizedListing]) -> ResultResp {
    let buffer = listings_workbook(rows)?;
    xlsx_response(buffer, "annonces.xlsx")
}
