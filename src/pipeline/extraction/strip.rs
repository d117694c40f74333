//! Parser-free fallback document.
//!
//! Understands only bare tag-name selectors (`p`, `article, main`) and the
//! `tag[attr='value']` form used for `<meta>` lookups. Nested elements of
//! the same tag are not balanced: a match ends at the first closing tag.

use std::sync::LazyLock;

use regex::Regex;

use super::types::DocumentQuery;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static TAG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("valid regex"));
static ATTR_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z][A-Za-z0-9]*)\[([A-Za-z:_-]+)=['"]([^'"]*)['"]\]$"#)
        .expect("valid regex")
});
static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9A-Fa-f]+|[0-9]+);").expect("valid regex"));

/// HTML held as a string and queried with regular expressions.
pub struct StrippedDocument {
    source: String,
}

impl StrippedDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            source: COMMENT_RE.replace_all(source, "").into_owned(),
        }
    }
}

/// Split a selector list into tag names, or `None` if any part is not a
/// bare tag name.
fn tag_names(selector: &str) -> Option<Vec<String>> {
    selector
        .split(',')
        .map(str::trim)
        .map(|part| {
            TAG_NAME_RE
                .is_match(part)
                .then(|| part.to_ascii_lowercase())
        })
        .collect()
}

fn element_regex(tag: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}\s*>")).ok()
}

/// Inner HTML of every element named in `tags`, ordered by position.
fn inner_blocks(html: &str, tags: &[String]) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for tag in tags {
        let Some(re) = element_regex(tag) else {
            continue;
        };
        for caps in re.captures_iter(html) {
            if let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) {
                found.push((whole.start(), inner.as_str().to_string()));
            }
        }
    }
    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, inner)| inner).collect()
}

/// Drop markup and decode the common character references.
pub fn strip_tags(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, "");
    decode_entities(&text)
}

fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    decoded
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

impl DocumentQuery for StrippedDocument {
    fn remove(&mut self, selector: &str) {
        let Some(tags) = tag_names(selector) else {
            return;
        };
        for tag in &tags {
            if let Some(re) = element_regex(tag) {
                self.source = re.replace_all(&self.source, " ").into_owned();
            }
        }
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        let Some(tags) = tag_names(selector) else {
            return Vec::new();
        };
        inner_blocks(&self.source, &tags)
            .iter()
            .map(|inner| strip_tags(inner))
            .collect()
    }

    fn texts_within(&self, container: &str, selector: &str) -> Vec<String> {
        let (Some(containers), Some(tags)) = (tag_names(container), tag_names(selector)) else {
            return Vec::new();
        };
        inner_blocks(&self.source, &containers)
            .iter()
            .flat_map(|scope| inner_blocks(scope, &tags))
            .map(|inner| strip_tags(&inner))
            .collect()
    }

    fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let caps = ATTR_SELECTOR_RE.captures(selector.trim())?;
        let (tag, key, value) = (&caps[1], &caps[2], &caps[3]);

        let open_tag = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>")).ok()?;
        let key_re = attribute_regex(key)?;
        let name_re = attribute_regex(name)?;

        let found = open_tag.find_iter(&self.source).find_map(|m| {
            let tag_src = m.as_str();
            let matches_key = key_re
                .captures(tag_src)
                .is_some_and(|c| c[1].eq_ignore_ascii_case(value));
            if !matches_key {
                return None;
            }
            name_re
                .captures(tag_src)
                .map(|c| decode_entities(&c[1]))
        });
        found
    }
}

fn attribute_regex(name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"(?i)\s{}\s*=\s*["']([^"']*)["']"#,
        regex::escape(name)
    ))
    .ok()
}
