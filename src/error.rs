use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("no price found in \"{text}\"")]
    NoMatch { text: String },

    #[error("cannot compute discount against a zero price")]
    ZeroPrice,
}

/// Failures scoped to a single item page. None of these abort the crawl.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("price parse error for {url}: {source}")]
    Price {
        url: String,
        #[source]
        source: PriceError,
    },

    #[error("cannot derive item code from {url}")]
    MissingCode { url: String },
}
