use async_trait::async_trait;

use super::ExtractionError;

/// Page-level metadata read alongside the article body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}

/// Readable text recovered from a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    /// Plain, whitespace-normalized body text. Never empty.
    pub text: String,
    pub metadata: PageMetadata,
}

/// Source of article text for a URL (allows mocking the network).
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_article(&self, url: &str) -> Result<ExtractedArticle, ExtractionError>;

    /// Body text only.
    async fn extract(&self, url: &str) -> Result<String, ExtractionError> {
        Ok(self.fetch_article(url).await?.text)
    }
}

/// Query capability over a parsed HTML document.
///
/// The extraction heuristics only speak this interface, so a full DOM
/// parser and a regex tag-stripper are interchangeable. Selectors an
/// implementation cannot evaluate simply match nothing.
pub trait DocumentQuery {
    /// Detach every element matching `selector` (and its subtree).
    fn remove(&mut self, selector: &str);

    /// Text content of each element matching `selector`, in document order.
    fn texts(&self, selector: &str) -> Vec<String>;

    /// Text content of each `selector` descendant of each `container`
    /// match, in document order.
    fn texts_within(&self, container: &str, selector: &str) -> Vec<String>;

    /// Value of attribute `name` on the first element matching `selector`.
    fn attr(&self, selector: &str, name: &str) -> Option<String>;
}
