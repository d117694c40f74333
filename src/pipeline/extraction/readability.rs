use super::document::DomDocument;
use super::strip::StrippedDocument;
use super::types::{DocumentQuery, PageMetadata};
use crate::models::HtmlEngine;

/// Elements that never carry article text.
pub const NON_CONTENT_SELECTOR: &str =
    "script, style, nav, header, footer, aside, form, iframe, noscript";

/// Article containers, most specific first.
pub const CONTAINER_SELECTORS: &[&str] = &[
    "article",
    "[role='main']",
    ".article-content",
    ".post-content",
    ".entry-content",
    ".content",
    "main",
    "#content",
    ".story-body",
    ".article-body",
];

/// Text-bearing blocks collected inside a matched container.
pub const BLOCK_SELECTOR: &str = "p, h1, h2, h3, h4, h5, h6, li";

/// Fallback paragraphs at or below this many characters are treated as
/// boilerplate (bylines, captions, share prompts).
pub const MIN_FALLBACK_PARAGRAPH_CHARS: usize = 50;

/// Collapse every whitespace run to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduce a document to its readable article text.
///
/// Mutates `doc`: non-content elements are removed first. Returns an empty
/// string when nothing survives the heuristics.
pub fn extract_readable_text<D: DocumentQuery + ?Sized>(doc: &mut D) -> String {
    doc.remove(NON_CONTENT_SELECTOR);

    let mut blocks: Vec<String> = Vec::new();
    for selector in CONTAINER_SELECTORS {
        blocks = doc
            .texts_within(selector, BLOCK_SELECTOR)
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !blocks.is_empty() {
            tracing::trace!(selector, blocks = blocks.len(), "Content container matched");
            break;
        }
    }

    if blocks.is_empty() {
        blocks = doc
            .texts("p")
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| text.chars().count() > MIN_FALLBACK_PARAGRAPH_CHARS)
            .collect();
    }

    normalize_whitespace(&blocks.join(" "))
}

/// Read title, description and author, preferring standard tags over
/// Open Graph / article properties.
pub fn extract_metadata<D: DocumentQuery + ?Sized>(doc: &D) -> PageMetadata {
    let first_text = |selector: &str| {
        doc.texts(selector)
            .into_iter()
            .map(|t| normalize_whitespace(&t))
            .find(|t| !t.is_empty())
    };
    let meta = |selector: &str| {
        doc.attr(selector, "content")
            .map(|t| normalize_whitespace(&t))
            .filter(|t| !t.is_empty())
    };

    PageMetadata {
        title: first_text("title").or_else(|| meta("meta[property='og:title']")),
        description: meta("meta[name='description']")
            .or_else(|| meta("meta[property='og:description']")),
        author: meta("meta[name='author']").or_else(|| meta("meta[property='article:author']")),
    }
}

/// Parse `html` with the chosen engine and return `(text, metadata)`.
pub fn reduce_html(html: &str, engine: HtmlEngine) -> (String, PageMetadata) {
    match engine {
        HtmlEngine::Dom => reduce(&mut DomDocument::parse(html)),
        HtmlEngine::TagStrip => reduce(&mut StrippedDocument::parse(html)),
    }
}

fn reduce<D: DocumentQuery>(doc: &mut D) -> (String, PageMetadata) {
    let metadata = extract_metadata(&*doc);
    let text = extract_readable_text(doc);
    (text, metadata)
}
