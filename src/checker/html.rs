// src/checker/html.rs
// =============================================================================
// This module pulls raw anchor targets out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Nothing is resolved or filtered here except empty hrefs: the crawler
// needs the raw text so exclusion patterns see exactly what the page says.
// Only statically present anchors are found; scripts are never run.
// =============================================================================

use scraper::{Html, Selector};

// Extracts every non-empty <a href="..."> value, in document order
//
// Example:
//   html   = "<a href='/docs'>Docs</a><a href=''>x</a><a>no href</a>"
//   result = ["/docs"]
pub fn extract_anchors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // "a[href]" is a constant selector, parsing it cannot fail
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(|href| href.to_string())
        .collect()
}
