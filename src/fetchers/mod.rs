//! Feed ingestion.
//!
//! Feed-based sources are described in configuration as [`FeedSource`]s and
//! handled by one generic RSS 2.0 fetcher:
//!
//! 1. **Download**: `reqwest` GET with retry and backoff ([`retry`])
//! 2. **Parse**: `<item>` elements via quick-xml's serde deserializer ([`rss`])
//! 3. **Normalize**: HTML stripped, dates parsed, defaults filled, invalid
//!    records dropped
//!
//! A failing feed is logged and contributes zero articles; it never aborts
//! the run.
//!
//! [`FeedSource`]: crate::config::FeedSource

use thiserror::Error;

pub mod retry;
pub mod rss;

/// Errors raised while retrieving or parsing a feed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Body is not a readable RSS document
    #[error("feed parse error: {0}")]
    Parse(#[from] quick_xml::DeError),
}

impl FetchError {
    /// Whether another attempt could succeed. Client errors (4xx) and
    /// malformed feeds are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status(code) => *code >= 500 || *code == 429,
            FetchError::Parse(_) => false,
        }
    }
}
