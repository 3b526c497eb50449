pub mod boutique_crawler;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod parsing;
pub mod scraper;
pub mod scrapers;
pub mod traits;

pub use boutique_crawler::BoutiqueCrawler;
pub use error::{ItemError, PriceError};
pub use models::{Gender, Item, ItemType, StockCode};
