use scraper::{ElementRef, Html, Selector};

use super::types::DocumentQuery;

/// Full DOM document backed by `scraper` (html5ever).
///
/// Queries walk from the root element rather than the node arena, so
/// elements detached by `remove` are no longer visible.
pub struct DomDocument {
    html: Html,
}

impl DomDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(selector, error = ?e, "Unparseable CSS selector");
            None
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

impl DocumentQuery for DomDocument {
    fn remove(&mut self, selector: &str) {
        let Some(selector) = parse_selector(selector) else {
            return;
        };

        let ids: Vec<_> = self.root().select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        self.root().select(&selector).map(element_text).collect()
    }

    fn texts_within(&self, container: &str, selector: &str) -> Vec<String> {
        let (Some(container), Some(selector)) = (parse_selector(container), parse_selector(selector))
        else {
            return Vec::new();
        };

        self.root()
            .select(&container)
            .flat_map(|scope| scope.select(&selector).map(element_text).collect::<Vec<_>>())
            .collect()
    }

    fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let selector = parse_selector(selector)?;
        self.root()
            .select(&selector)
            .find_map(|el| el.value().attr(name).map(str::to_string))
    }
}
