//! HTML parser for extracting raw hrefs
//!
//! This module reads the hrefs a page links to:
//! - `href` of every `<a>` element
//! - `data-href` of any element (used by share buttons and widgets)
//!
//! Values are returned untouched, in document order and with duplicates.
//! Normalization and deduplication happen during classification.

use scraper::{Html, Selector};

/// Extracts every raw href of an HTML document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// The `href` of each anchor and the `data-href` of each element, in
/// document order. An element carrying both yields its `data-href` first.
///
/// # Example
///
/// ```
/// use medium_scout::crawler::extract_hrefs;
///
/// let html = r#"<a href="/page">Link</a><div data-href="https://facebook.com/x"></div>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page", "https://facebook.com/x"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href], [data-href]") else {
        return Vec::new();
    };

    let mut hrefs = Vec::new();

    for element in document.select(&selector) {
        let value = element.value();

        if let Some(data_href) = value.attr("data-href") {
            hrefs.push(data_href.to_string());
        }

        if value.name() == "a" {
            if let Some(href) = value.attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}
