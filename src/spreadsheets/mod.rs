pub mod export_xlsx;
pub mod interchange_csv;

pub use export_xlsx::export_listings_xlsx;
pub use interchange_csv::{read_interchange_file, write_interchange_file, CSV_HEADER};
