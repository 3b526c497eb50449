//! Traits and interfaces for site-specific crawling

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use crate::models::{Item, ItemType};

/// Configuration for a storefront crawler
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name for the website
    pub name: String,
    /// Base URL for the website
    pub base_url: Url,
    /// Listing page that links to every item
    pub start_path: String,
    /// Listing page of the shoe category, used to settle ambiguous sizes
    pub shoe_category_path: String,
    /// CSS selectors for extracting data
    pub selectors: SiteSelectors,
}

impl ScraperConfig {
    /// Resolves a path against the base URL
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// CSS selectors for the listing and item pages
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Item tiles on listing pages
    pub listing_item: String,
    /// Item name inside a listing tile
    pub listing_item_name: String,
    /// Accordion holding the description panel
    pub description_accordion: String,
    /// Header text marking the description panel
    pub description_header: String,
    pub designer: String,
    /// Links of the breadcrumb trail; the item name follows the last one
    pub breadcrumb_link: String,
    /// Thumbnail links pointing at large images
    pub image_link: String,
    pub price: String,
    /// Options of the size select, placeholder first
    pub size_option: String,
}

/// Cross-reference against a known category listing
#[async_trait]
pub trait CategoryLookup: Send + Sync {
    /// Resolves the type of an item whose sizes were inconclusive
    ///
    /// # Returns
    /// * `Result<ItemType>` - Shoes when the name is listed in the shoe category, apparel otherwise
    async fn resolve(&self, item_name: &str) -> Result<ItemType>;
}

/// Trait for site-specific crawlers
#[async_trait]
pub trait WebsiteScraper: Send + Sync {
    /// Get the configuration for this scraper
    fn config(&self) -> &ScraperConfig;

    /// Crawl every item reachable from the start listing
    ///
    /// # Returns
    /// * `Result<Vec<Item>>` - Items parsed successfully, in no particular order
    async fn crawl_items(&self) -> Result<Vec<Item>>;

    /// Extract item page links from a listing page
    ///
    /// # Arguments
    /// * `document` - The parsed listing HTML
    /// * `page_url` - URL the listing was fetched from, for resolving relative links
    fn extract_item_links(&self, document: &scraper::Html, page_url: &Url) -> Vec<Url>;
}
