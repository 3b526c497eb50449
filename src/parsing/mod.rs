//! Pure parsers for the text fragments of an item page.
//!
//! Nothing here performs I/O or keeps state between calls, so the same
//! functions can be used from any number of concurrent item parses.

pub mod price;
pub mod sizes;
pub mod stock;

pub use price::{PriceInfo, parse_price};
pub use sizes::{SizeVerdict, classify_sizes};
pub use stock::{map_stock_status, strip_sold_out};
