pub mod oxygen;

pub use oxygen::{OxygenScraper, oxygen_config, parse_item_page};
