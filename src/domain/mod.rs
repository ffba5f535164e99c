pub mod analytics;
pub mod listing;
pub mod normalize;
