//! Oxygen Boutique specific crawler implementation

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{info, warn};
use url::Url;

use crate::config::CrawlSettings;
use crate::error::{ItemError, PriceError};
use crate::models::{Gender, Item, ItemType};
use crate::parsing::{SizeVerdict, classify_sizes, map_stock_status, parse_price};
use crate::scraper::{PageFetcher, RequestGate, ShoeCategoryLookup};
use crate::traits::{CategoryLookup, ScraperConfig, SiteSelectors, WebsiteScraper};

/// Oxygen only sells womenswear
const GENDER: Gender = Gender::Female;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Default configuration for the Oxygen storefront
pub fn oxygen_config(base_url: Url) -> ScraperConfig {
    ScraperConfig {
        name: "Oxygen".to_string(),
        base_url,
        // An empty search with ViewAll lists every item on one page
        start_path: "/SearchResults.aspx?ViewAll=1".to_string(),
        shoe_category_path: "/Shoes-All.aspx?ViewAll=1".to_string(),
        selectors: SiteSelectors {
            listing_item: "div.itm".to_string(),
            listing_item_name: "h3".to_string(),
            description_accordion: "#accordion".to_string(),
            description_header: "Description".to_string(),
            designer: ".brand_name > a".to_string(),
            breadcrumb_link: "div.breadcrumb a".to_string(),
            image_link: "#product-images #thumbnails-container a".to_string(),
            price: ".price".to_string(),
            size_option: "#ppSizeid select option".to_string(),
        },
    }
}

/// Compiled form of [`SiteSelectors`] for item pages
pub struct ItemSelectors {
    description_accordion: Selector,
    description_header: String,
    designer: Selector,
    breadcrumb_link: Selector,
    image_link: Selector,
    price: Selector,
    size_option: Selector,
}

impl TryFrom<&SiteSelectors> for ItemSelectors {
    type Error = anyhow::Error;

    fn try_from(selectors: &SiteSelectors) -> Result<Self> {
        let parse = |css: &str, what: &str| {
            Selector::parse(css).map_err(|e| anyhow!("Failed to parse {what} selector: {e:?}"))
        };

        Ok(Self {
            description_accordion: parse(&selectors.description_accordion, "description")?,
            description_header: selectors.description_header.clone(),
            designer: parse(&selectors.designer, "designer")?,
            breadcrumb_link: parse(&selectors.breadcrumb_link, "breadcrumb")?,
            image_link: parse(&selectors.image_link, "image")?,
            price: parse(&selectors.price, "price")?,
            size_option: parse(&selectors.size_option, "size")?,
        })
    }
}

/// An item page with everything but the type settled
#[derive(Debug, Clone)]
pub struct ParsedItem {
    pub item: Item,
    pub verdict: SizeVerdict,
}

/// Builds an item record from a product page.
///
/// Runs synchronously and touches no shared state. The type is left unset;
/// callers settle it from [`ParsedItem::verdict`].
///
/// # Errors
///
/// Returns [`ItemError::MissingCode`] when the URL has no usable last path
/// segment and [`ItemError::Price`] when the price cannot be read.
pub fn parse_item_page(
    url: &Url,
    html: &str,
    selectors: &ItemSelectors,
) -> Result<ParsedItem, ItemError> {
    let document = Html::parse_document(html);

    let code = item_code(url).ok_or_else(|| ItemError::MissingCode {
        url: url.to_string(),
    })?;

    let price_text = document
        .select(&selectors.price)
        .next()
        .map(|el| squash_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default();
    let price = parse_price(&price_text).map_err(|source| ItemError::Price {
        url: url.to_string(),
        source,
    })?;

    let sizes: Vec<String> = document
        .select(&selectors.size_option)
        .map(|el| el.text().collect::<String>())
        .collect();

    let item = Item {
        code,
        name: item_name(&document, selectors),
        description: description(&document, selectors),
        designer: document
            .select(&selectors.designer)
            .next()
            .map(|el| squash_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default(),
        gender: GENDER,
        // Colour detection is not implemented
        raw_color: None,
        color: None,
        image_urls: image_urls(&document, selectors, url),
        link: url.to_string(),
        usd_price: price.usd_price,
        sale_discount: price.sale_discount,
        stock_status: map_stock_status(&sizes),
        item_type: None,
    };

    Ok(ParsedItem {
        item,
        verdict: classify_sizes(&sizes),
    })
}

/// Last path segment without its extension
fn item_code(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let stem = Path::new(segment).file_stem()?.to_str()?;
    (!stem.is_empty()).then(|| stem.to_string())
}

fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Panel that follows the accordion header mentioning the description
fn description(document: &Html, selectors: &ItemSelectors) -> String {
    let Some(accordion) = document.select(&selectors.description_accordion).next() else {
        return String::new();
    };

    let header = accordion
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.text().any(|t| t.contains(&selectors.description_header)));

    header
        .and_then(|header| header.next_siblings().find_map(ElementRef::wrap))
        .filter(|panel| panel.value().name() == "div")
        .map(|panel| squash_whitespace(&panel.text().collect::<String>()))
        .unwrap_or_default()
}

/// Breadcrumb text after the last link, which names the current item
fn item_name(document: &Html, selectors: &ItemSelectors) -> String {
    let Some(crumb) = document
        .select(&selectors.breadcrumb_link)
        .last()
        .and_then(|link| link.parent())
        .and_then(ElementRef::wrap)
    else {
        return String::new();
    };

    let mut text = String::new();
    text_without_links(crumb, &mut text);
    squash_whitespace(&text)
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '|' | '»'))
        .to_string()
}

fn text_without_links(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if el.name() == "a" => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    text_without_links(child, out);
                }
            }
            _ => {}
        }
    }
}

fn image_urls(document: &Html, selectors: &ItemSelectors, page_url: &Url) -> Vec<String> {
    document
        .select(&selectors.image_link)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| page_url.join(href.trim()).ok())
        .map(String::from)
        .collect()
}

/// Crawler for oxygenboutique.com
pub struct OxygenScraper {
    fetcher: PageFetcher,
    config: ScraperConfig,
    item_selectors: ItemSelectors,
    item_link: Selector,
    lookup: Arc<dyn CategoryLookup>,
    concurrency: usize,
    gate: RequestGate,
}

impl OxygenScraper {
    /// Create a new Oxygen crawler whose category lookup hits the live shoe listing
    pub fn new(settings: &CrawlSettings) -> Result<Self> {
        Self::with_config(settings, oxygen_config(settings.base_url.clone()))
    }

    /// Create a crawler for a storefront laid out like Oxygen's
    pub fn with_config(settings: &CrawlSettings, config: ScraperConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(USER_AGENT, settings.request_timeout)?;

        let lookup = ShoeCategoryLookup::new(
            fetcher.clone(),
            config.url_for(&config.shoe_category_path)?,
            format!(
                "{} {}",
                config.selectors.listing_item, config.selectors.listing_item_name
            ),
            settings.lookup_timeout,
        );
        let item_selectors = ItemSelectors::try_from(&config.selectors)?;
        let item_link = Selector::parse(&format!("{} a[href]", config.selectors.listing_item))
            .map_err(|e| anyhow!("Failed to parse listing link selector: {e:?}"))?;

        Ok(Self {
            fetcher,
            config,
            item_selectors,
            item_link,
            lookup: Arc::new(lookup),
            concurrency: settings.concurrency.max(1),
            gate: RequestGate::new(settings.request_delay),
        })
    }

    /// Replace the category lookup
    #[must_use]
    pub fn with_lookup(mut self, lookup: Arc<dyn CategoryLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    /// Fetch and parse a single item page, settling its type
    pub async fn scrape_item(&self, url: Url) -> Result<Item, ItemError> {
        self.gate.wait().await;

        let html = self.fetcher.fetch_html(&url).await?;
        let ParsedItem { mut item, verdict } = parse_item_page(&url, &html, &self.item_selectors)?;

        item.item_type = self.resolve_type(&item.name, verdict).await;
        Ok(item)
    }

    async fn resolve_type(&self, item_name: &str, verdict: SizeVerdict) -> Option<ItemType> {
        match verdict {
            SizeVerdict::Resolved(item_type) => Some(item_type),
            SizeVerdict::Unresolved => None,
            SizeVerdict::NeedsLookup if item_name.trim().is_empty() => {
                warn!("Item has no name to look up, leaving its type unresolved");
                None
            }
            SizeVerdict::NeedsLookup => match self.lookup.resolve(item_name).await {
                Ok(item_type) => Some(item_type),
                Err(e) => {
                    warn!("Category lookup failed for '{}': {}", item_name, e);
                    None
                }
            },
        }
    }
}

#[async_trait]
impl WebsiteScraper for OxygenScraper {
    fn config(&self) -> &ScraperConfig {
        &self.config
    }

    async fn crawl_items(&self) -> Result<Vec<Item>> {
        let start_url = self.config.url_for(&self.config.start_path)?;
        info!("Crawling {} from {}", self.config.name, start_url);

        let html = self
            .fetcher
            .fetch_html(&start_url)
            .await
            .map_err(|e| anyhow!("Failed to fetch listing page {start_url}: {e}"))?;

        // Parse in a scope so the document is dropped before the next await
        let links = {
            let document = Html::parse_document(&html);
            self.extract_item_links(&document, &start_url)
        };
        info!("Found {} item links on {}", links.len(), self.config.name);

        let outcomes: Vec<(Url, Result<Item, ItemError>)> = stream::iter(links)
            .map(|url| async move {
                let outcome = self.scrape_item(url.clone()).await;
                (url, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut items = Vec::with_capacity(outcomes.len());
        let mut skipped = 0;
        for (url, outcome) in outcomes {
            match outcome {
                Ok(item) => items.push(item),
                Err(ItemError::Price {
                    source: PriceError::NoMatch { text },
                    ..
                }) => {
                    warn!("Skipping {url}: no price in {text:?}");
                    skipped += 1;
                }
                Err(e) => {
                    warn!("Skipping {url}: {e}");
                    skipped += 1;
                }
            }
        }

        let unresolved = items.iter().filter(|item| item.item_type.is_none()).count();
        info!(
            "Scraped {} items from {} ({} skipped, {} with unresolved type)",
            items.len(),
            self.config.name,
            skipped,
            unresolved
        );
        Ok(items)
    }

    fn extract_item_links(&self, document: &Html, page_url: &Url) -> Vec<Url> {
        let mut seen = HashSet::new();
        document
            .select(&self.item_link)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| page_url.join(href.trim()).ok())
            .filter(|url| url.host_str() == self.config.base_url.host_str())
            .filter(|url| url.path().to_ascii_lowercase().ends_with(".aspx"))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}
