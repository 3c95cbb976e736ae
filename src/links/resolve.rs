// src/links/resolve.rs
// =============================================================================
// This module turns a raw href into a path relative to the site root.
//
// Javadoc pages link to each other with relative paths:
//   processing/core/PApplet.html links "../../index.html" and "PVector.html"
// Everything we download lives under one base URL, so we work with plain
// relative path strings ("processing/core/PVector.html") rather than full URLs.
//
// Resolution rules, in order:
// 1. Absolute links ("http..." or any other scheme) are discarded
// 2. "../x" is joined to the page directory and the ".." segments folded
// 3. "./x" drops the prefix and is joined to the page directory
// 4. "a/b.html" (contains a slash) is taken as relative to the site root
// 5. "b.html" is joined to the page directory
//
// Fragments ("#...") and queries ("?...") are stripped first. Results are
// normalized, and anything that would climb above the site root is dropped
// so a hostile page can never make us write outside the download directory.
// =============================================================================

use url::Url;

// Resolves an href found on a page into a site-relative path
//
// Parameters:
//   href: the raw attribute value
//   page_dir: directory of the page it was found on ("" for the root)
//
// Returns: Some(relative_path) or None if the link must not be queued
//
// Examples:
//   resolve_link("../x.html", "a/b")       -> Some("a/x.html")
//   resolve_link("./c.html", "a/b")        -> Some("a/b/c.html")
//   resolve_link("p/q.html", "a/b")        -> Some("p/q.html")
//   resolve_link("https://x.org/a.html", "") -> None
pub fn resolve_link(href: &str, page_dir: &str) -> Option<String> {
    if is_external(href) {
        return None;
    }

    let href = strip_suffixes(href);
    if href.is_empty() {
        return None;
    }

    let joined = if href.starts_with("../") {
        join(page_dir, href)
    } else if let Some(rest) = href.strip_prefix("./") {
        join(page_dir, rest)
    } else if href.contains('/') {
        href.to_string()
    } else {
        join(page_dir, href)
    };

    normalize(&joined)
}

// Returns the directory part of a site-relative path
//
// Example: "processing/core/PApplet.html" -> "processing/core"
//          "index.html" -> ""
pub fn page_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn is_external(href: &str) -> bool {
    // Url::parse only succeeds for hrefs that carry a scheme
    // (http:, https:, mailto:, javascript:, ...). Relative paths fail with
    // RelativeUrlWithoutBase.
    href.starts_with("http") || Url::parse(href).is_ok()
}

fn strip_suffixes(href: &str) -> &str {
    let href = href.split('#').next().unwrap_or("");
    href.split('?').next().unwrap_or("")
}

fn join(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{}/{}", dir, rest)
    }
}

// Folds "." and ".." segments and drops empty ones
//
// Returns None when the path is empty or escapes the root.
fn normalize(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
