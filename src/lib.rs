pub mod config;
pub mod listing_finder;
pub mod metadata_extractor;
pub mod models;
pub mod notifiers;
pub mod price;
pub mod runner;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use models::Listing;
pub use utils::error::{AppError, Result};
