// src/links/mod.rs
// =============================================================================
// Link discovery for the crawler.
//
// Submodules:
// - html: pulls asset hrefs (.html/.css/.js) out of a page
// - resolve: turns those hrefs into site-relative paths
// =============================================================================

mod html;
mod resolve;

pub use html::extract_asset_links;
pub use resolve::{page_dir, resolve_link};

/// Finds every new site-relative path a page links to.
///
/// `page` is the site-relative path of the page itself; `html` is its body.
pub fn discover_links(page: &str, html: &str) -> Vec<String> {
    let dir = page_dir(page);
    extract_asset_links(html)
        .iter()
        .filter_map(|href| resolve_link(href, dir))
        .collect()
}
