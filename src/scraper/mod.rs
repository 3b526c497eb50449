use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

use crate::error::ItemError;
use crate::models::ItemType;
use crate::traits::CategoryLookup;

/// Shared HTTP client for listing, item and lookup pages
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page body, treating any non-2xx status as an error.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, ItemError> {
        self.fetch(url, None).await
    }

    /// Like [`Self::fetch_html`] but with a tighter per-request timeout.
    pub async fn fetch_html_within(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<String, ItemError> {
        self.fetch(url, Some(timeout)).await
    }

    async fn fetch(&self, url: &Url, timeout: Option<Duration>) -> Result<String, ItemError> {
        debug!("Fetching {url}");

        let mut request = self.client.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ItemError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Spaces out requests shared by concurrent workers.
///
/// Each caller reserves the next free slot under the lock, so with several
/// workers in flight the requests still go out `min_gap` apart.
pub struct RequestGate {
    min_gap: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestGate {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits until this caller's slot comes up
    pub async fn wait(&self) {
        if self.min_gap.is_zero() {
            return;
        }

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next_slot {
                Some(next) if next > now => next,
                _ => now,
            };
            *next_slot = Some(slot + self.min_gap);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

/// Settles ambiguous sizes by looking the item up on the shoe category page.
///
/// Every call fetches the page again; the catalogue changes under us and
/// results are not cached.
pub struct ShoeCategoryLookup {
    fetcher: PageFetcher,
    category_url: Url,
    name_selector: String,
    timeout: Duration,
}

impl ShoeCategoryLookup {
    pub fn new(
        fetcher: PageFetcher,
        category_url: Url,
        name_selector: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            category_url,
            name_selector: name_selector.into(),
            timeout,
        }
    }
}

#[async_trait]
impl CategoryLookup for ShoeCategoryLookup {
    async fn resolve(&self, item_name: &str) -> Result<ItemType> {
        let html = self
            .fetcher
            .fetch_html_within(&self.category_url, self.timeout)
            .await?;

        let listed = category_lists_name(&html, &self.name_selector, item_name)?;
        info!(
            "Category lookup for '{}': {}",
            item_name,
            if listed { "shoes" } else { "apparel" }
        );

        Ok(if listed {
            ItemType::Shoes
        } else {
            ItemType::Apparel
        })
    }
}

/// Whether any displayed name on a category page contains `item_name`.
pub fn category_lists_name(html: &str, name_selector: &str, item_name: &str) -> Result<bool> {
    let selector = Selector::parse(name_selector)
        .map_err(|e| anyhow!("Failed to parse category name selector: {e:?}"))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .any(|el| el.text().collect::<String>().contains(item_name)))
}
