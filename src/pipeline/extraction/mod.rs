//! URL content acquisition: fetch a third-party page and reduce its HTML
//! to the readable article body.
//!
//! fetch (validated URL, 15s, ≤10 redirects) → parse → strip boilerplate →
//! container selectors → long-paragraph fallback → whitespace normalization

pub mod document;
pub mod fetcher;
pub mod readability;
pub mod strip;
pub mod types;

pub use document::*;
pub use fetcher::*;
pub use readability::*;
pub use strip::*;
pub use types::*;

pub use crate::models::HtmlEngine;

use crate::models::ErrorKind;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid URL provided: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("too many redirects fetching {url}")]
    TooManyRedirects {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("no content extracted from {url}")]
    NoContent { url: String },

    #[error("HTML reduction task failed for {url}: {source}")]
    Worker {
        url: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl ExtractionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            _ => ErrorKind::ScrapeFailed,
        }
    }

    /// True for failures that happened after the URL was accepted
    /// (transport, redirects, status, empty page, reduction task).
    pub fn is_scrape_failure(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }
}
