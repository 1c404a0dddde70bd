use scraper::{ElementRef, Html, Selector};

use crate::models::{ButtonDescriptor, PageSnapshot};

/// Build a classifier snapshot from raw HTML: all text nodes plus every
/// `<button>` in document order. Static HTML carries no cursor information.
pub fn snapshot_from_html(html: &str) -> PageSnapshot {
    let document = Html::parse_document(html);
    PageSnapshot::new(&document_text(&document), find_buttons(&document))
}

/// Visible text of an HTML document, for fetchers that read buttons elsewhere.
pub fn visible_text(html: &str) -> String {
    document_text(&Html::parse_document(html))
}

fn document_text(document: &Html) -> String {
    element_text(&document.root_element())
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn find_buttons(document: &Html) -> Vec<ButtonDescriptor> {
    let selector = match Selector::parse("button") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Invalid button selector: {:?}", e);
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .map(|button| ButtonDescriptor::new(&element_text(&button), None))
        .collect()
}
