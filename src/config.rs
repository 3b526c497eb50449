//! Crawl settings, read from the command line with environment fallbacks

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://www.oxygenboutique.com";

#[derive(Debug, Clone, Args)]
pub struct CrawlArgs {
    /// Storefront root
    #[arg(long, env = "OXYGEN_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// File the scraped items are written to
    #[arg(long, env = "OXYGEN_OUTPUT", default_value = "items.json")]
    pub output: PathBuf,

    /// Item pages fetched at the same time
    #[arg(long, env = "OXYGEN_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Pause before each item request, in milliseconds
    #[arg(long, env = "OXYGEN_REQUEST_DELAY_MS", default_value_t = 500)]
    pub request_delay_ms: u64,

    #[arg(long, env = "OXYGEN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Timeout of the shoe category lookup
    #[arg(long, env = "OXYGEN_LOOKUP_TIMEOUT_SECS", default_value_t = 10)]
    pub lookup_timeout_secs: u64,
}

impl CrawlArgs {
    pub fn settings(&self) -> CrawlSettings {
        CrawlSettings {
            base_url: self.base_url.clone(),
            concurrency: self.concurrency.max(1),
            request_delay: Duration::from_millis(self.request_delay_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            lookup_timeout: Duration::from_secs(self.lookup_timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub base_url: Url,
    pub concurrency: usize,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub lookup_timeout: Duration,
}

impl CrawlSettings {
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            concurrency: 4,
            request_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        crawl: CrawlArgs,
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--base-url",
            "http://localhost:8080",
            "--concurrency",
            "0",
            "--request-delay-ms",
            "0",
        ]);
        let settings = cli.crawl.settings();

        assert_eq!(settings.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(settings.concurrency, 1);
        assert_eq!(settings.request_delay, Duration::ZERO);
        assert_eq!(settings.lookup_timeout, Duration::from_secs(10));
    }
}
