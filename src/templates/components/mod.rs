mod bars;
mod card;
pub mod error;

pub use bars::{bar_percent, bar_rows};
pub use card::{card, stat_card};
pub use error::error_page;
