// src/links/html.rs
// =============================================================================
// This module extracts candidate links from downloaded Javadoc pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on malformed markup (html5ever recovers like a browser does)
//
// Only hrefs that point at documentation assets are kept: the raw value must
// end in `.html`, `.css` or `.js`. Anything else (`.htm`, images, anchors with
// a fragment suffix) is ignored here and never reaches the worklist.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// File suffixes worth mirroring.
const ASSET_SUFFIXES: [&str; 3] = [".html", ".css", ".js"];

// Extracts every asset href from an HTML page
//
// Parameters:
//   html: the page content (borrowed as &str)
//
// Returns: the set of raw href values (not yet resolved)
//
// Example:
//   html = "<a href='PApplet.html'>PApplet</a><a href='logo.png'>x</a>"
//   result = {"PApplet.html"}
pub fn extract_asset_links(html: &str) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    // The selector is a constant; if it somehow failed to parse we still must
    // not raise out of this stage, so we just report no links.
    let selector = match Selector::parse("a[href], link[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if is_asset_link(href) {
                links.insert(href.to_string());
            }
        }
    }

    links
}

// Checks whether an href names an asset we mirror
fn is_asset_link(href: &str) -> bool {
    !href.is_empty() && ASSET_SUFFIXES.iter().any(|suffix| href.ends_with(suffix))
}
