use anyhow::Result;
use tracing::info;

use crate::config::CrawlArgs;
use crate::output::JsonFileSink;
use crate::scrapers::OxygenScraper;
use crate::traits::WebsiteScraper;

pub struct BoutiqueCrawler {
    scraper: OxygenScraper,
    sink: JsonFileSink,
}

impl BoutiqueCrawler {
    pub fn new(args: &CrawlArgs) -> Result<Self> {
        let scraper = OxygenScraper::new(&args.settings())?;
        let sink = JsonFileSink::new(&args.output);

        Ok(Self { scraper, sink })
    }

    pub fn from_parts(scraper: OxygenScraper, sink: JsonFileSink) -> Self {
        Self { scraper, sink }
    }

    /// Crawls the storefront and writes every parsed item to the sink
    pub async fn run(&self) -> Result<usize> {
        let items = self.scraper.crawl_items().await?;

        if items.is_empty() {
            info!("No items found on {}", self.scraper.config().name);
        }
        self.sink.write_items(&items).await?;

        Ok(items.len())
    }
}
