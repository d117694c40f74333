use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Url;

use super::readability::reduce_html;
use super::types::{ContentSource, ExtractedArticle};
use super::ExtractionError;
use crate::config::{BROWSER_USER_AGENT, MAX_REDIRECTS, SCRAPE_TIMEOUT};
use crate::models::HtmlEngine;

/// Fetches third-party pages over HTTP and reduces them to article text.
pub struct ContentExtractor {
    client: reqwest::Client,
    engine: HtmlEngine,
}

impl ContentExtractor {
    /// Build an extractor with the standard fetch limits (15s, 10 redirects).
    pub fn new(engine: HtmlEngine) -> Result<Self, reqwest::Error> {
        Self::with_timeout(engine, SCRAPE_TIMEOUT)
    }

    /// Same redirect cap and User-Agent, custom whole-fetch timeout.
    pub fn with_timeout(engine: HtmlEngine, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(BROWSER_USER_AGENT)
            .build()?;

        Ok(Self { client, engine })
    }

    pub fn engine(&self) -> HtmlEngine {
        self.engine
    }
}

/// Accept only absolute `http`/`https` URLs that name a host.
pub fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let url = Url::parse(raw.trim()).map_err(|_| ExtractionError::InvalidUrl(raw.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl(raw.to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ExtractionError::InvalidUrl(raw.to_string()));
    }

    Ok(url)
}

#[async_trait]
impl ContentSource for ContentExtractor {
    async fn fetch_article(&self, raw_url: &str) -> Result<ExtractedArticle, ExtractionError> {
        let url = validate_url(raw_url)?;
        let url_str = url.to_string();

        tracing::debug!(url = %url_str, engine = %self.engine, "Fetching page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_redirect() {
                ExtractionError::TooManyRedirects {
                    url: url_str.clone(),
                    source: e,
                }
            } else {
                ExtractionError::Fetch {
                    url: url_str.clone(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::HttpStatus {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ExtractionError::Fetch {
            url: url_str.clone(),
            source: e,
        })?;

        // Parsing a large page is CPU-bound; keep it off the async workers.
        let engine = self.engine;
        let (text, metadata) = tokio::task::spawn_blocking(move || reduce_html(&body, engine))
            .await
            .map_err(|source| ExtractionError::Worker {
                url: url_str.clone(),
                source,
            })?;
        if text.is_empty() {
            return Err(ExtractionError::NoContent { url: url_str });
        }

        tracing::debug!(
            url = %url_str,
            title = metadata.title.as_deref().unwrap_or(""),
            chars = text.len(),
            "Page content extracted"
        );

        Ok(ExtractedArticle { text, metadata })
    }
}
