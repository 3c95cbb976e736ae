// src/crawl/queue.rs
// =============================================================================
// This module implements the crawl loop with a breadth-first worklist.
//
// How it works:
// 1. Seed the worklist with the known entry pages
// 2. Pop a path and download it into the scratch directory
// 3. If it is an HTML page, extract its links and queue the unseen ones
// 4. Repeat until the worklist is empty, or until the run is interrupted
//
// An interrupt abandons an in-flight network request right away, but a file
// that is already being written is always finished first. Nothing keeps
// touching the scratch directory once crawl_site has returned.
//
// Each path moves from pending to either downloaded or failed exactly once.
// There is no depth limit: the `seen` set is what keeps cyclic Javadoc links
// ("index.html" <-> "overview-summary.html") from looping forever.
// =============================================================================

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, info, warn};

use super::fetch::{write_mirror, Fetcher};
use crate::interrupt::{Interrupt, Interrupted};
use crate::links::{discover_links, resolve_link};

/// Pending paths plus the bookkeeping that keeps each one unique.
#[derive(Debug, Default)]
pub struct Worklist {
    pending: VecDeque<String>,
    // Every path ever queued, whatever happened to it afterwards
    seen: HashSet<String>,
    downloaded: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `path` unless it was queued before. Returns whether it was added.
    pub fn enqueue(&mut self, path: String) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.pending.push_back(path);
        true
    }

    pub fn next(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn mark_downloaded(&mut self, path: String) {
        self.downloaded.insert(path);
    }

    pub fn mark_failed(&mut self, path: String) {
        self.failed.insert(path);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn into_summary(self) -> CrawlSummary {
        CrawlSummary {
            downloaded: self.downloaded,
            failed: self.failed,
        }
    }
}

/// What a finished crawl produced.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub downloaded: BTreeSet<String>,
    pub failed: BTreeSet<String>,
}

// Crawls the site starting from the seed pages
//
// Parameters:
//   fetcher: HTTP client bound to the site's base URL
//   seeds: site-relative entry points
//   root: scratch directory the mirror is written into
//   interrupt: stops the crawl between files or during a fetch
//
// Returns: which paths downloaded and which failed. Individual failures are
// logged and skipped; the crawl only stops early when interrupted.
pub async fn crawl_site(
    fetcher: &Fetcher,
    seeds: &[String],
    root: &Path,
    mut interrupt: Interrupt,
) -> Result<CrawlSummary, Interrupted> {
    let mut worklist = Worklist::new();

    for seed in seeds {
        // Seeds go through the same cleanup as discovered links
        match resolve_link(seed, "") {
            Some(path) => {
                worklist.enqueue(path);
            }
            None => warn!(seed = %seed, "Ignoring seed that is not a site-relative path"),
        }
    }

    while let Some(path) = worklist.next() {
        interrupt.check()?;
        info!(url = %fetcher.url_for(&path), "Downloading");

        let fetched = tokio::select! {
            fetched = fetcher.fetch(&path) => fetched,
            _ = interrupt.raised() => return Err(Interrupted),
        };

        // Not raced against the interrupt: see write_mirror
        let written = match fetched {
            Ok(body) => write_mirror(root, &path, &body).await.map(|()| body),
            Err(e) => Err(e),
        };

        let body = match written {
            Ok(body) => body,
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to download");
                worklist.mark_failed(path);
                continue;
            }
        };

        if path.ends_with(".html") {
            let html = String::from_utf8_lossy(&body);
            let mut queued = 0;
            for link in discover_links(&path, &html) {
                if worklist.enqueue(link) {
                    queued += 1;
                }
            }
            debug!(
                path = %path,
                queued,
                pending = worklist.pending_len(),
                "Scanned page for links"
            );
        }

        worklist.mark_downloaded(path);
    }

    Ok(worklist.into_summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
            .mount(server)
            .await;
    }

    fn seeds(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|s| s.to_string()).collect()
    }

    // An interrupt nobody will ever raise
    fn quiet() -> Interrupt {
        Interrupt::new().1
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut worklist = Worklist::new();
        assert!(worklist.enqueue("a.html".to_string()));
        assert!(!worklist.enqueue("a.html".to_string()));
        assert_eq!(worklist.pending_len(), 1);
    }

    #[test]
    fn test_processed_paths_are_never_requeued() {
        let mut worklist = Worklist::new();
        worklist.enqueue("a.html".to_string());
        worklist.enqueue("b.html".to_string());

        let a = worklist.next().unwrap();
        worklist.mark_downloaded(a);
        let b = worklist.next().unwrap();
        worklist.mark_failed(b);

        assert!(!worklist.enqueue("a.html".to_string()));
        assert!(!worklist.enqueue("b.html".to_string()));
        assert!(worklist.next().is_none());

        let summary = worklist.into_summary();
        assert_eq!(summary.downloaded.len(), 1);
        assert_eq!(summary.failed.len(), 1);
    }

    #[test]
    fn test_worklist_is_fifo() {
        let mut worklist = Worklist::new();
        worklist.enqueue("first.html".to_string());
        worklist.enqueue("second.html".to_string());
        assert_eq!(worklist.next().as_deref(), Some("first.html"));
        assert_eq!(worklist.next().as_deref(), Some("second.html"));
    }

    #[tokio::test]
    async fn test_single_page_without_links() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", "<html><body>Hello</body></html>").await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let summary = crawl_site(&fetcher, &seeds(&["index.html"]), root.path(), quiet())
            .await
            .unwrap();

        let expected: BTreeSet<String> = seeds(&["index.html"]).into_iter().collect();
        assert_eq!(summary.downloaded, expected);
        assert!(summary.failed.is_empty());
        assert!(root.path().join("index.html").is_file());
    }

    #[tokio::test]
    async fn test_follows_links_and_survives_cycles() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/index.html",
            r#"<a href="processing/core/PApplet.html">PApplet</a>
               <link rel="stylesheet" href="stylesheet.css">"#,
        )
        .await;
        mount_page(
            &server,
            "/processing/core/PApplet.html",
            r#"<a href="../../index.html">home</a>
               <a href="PVector.html">PVector</a>
               <a href="https://processing.org/index.html">external</a>"#,
        )
        .await;
        mount_page(
            &server,
            "/processing/core/PVector.html",
            r#"<a href="PApplet.html">back</a><a href="notes.htm">legacy</a>"#,
        )
        .await;
        mount_page(&server, "/stylesheet.css", "body { color: black; }").await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let summary = crawl_site(&fetcher, &seeds(&["index.html"]), root.path(), quiet())
            .await
            .unwrap();

        let expected: BTreeSet<String> = seeds(&[
            "index.html",
            "processing/core/PApplet.html",
            "processing/core/PVector.html",
            "stylesheet.css",
        ])
        .into_iter()
        .collect();
        assert_eq!(summary.downloaded, expected);
        assert!(summary.failed.is_empty());

        // Every page was requested once, cycles included
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_seed_is_excluded_and_not_followed() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", "<html></html>").await;
        // "broken.html" is unmounted, so wiremock answers 404

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let summary =
            crawl_site(&fetcher, &seeds(&["broken.html", "index.html"]), root.path(), quiet())
                .await
                .unwrap();

        assert_eq!(summary.downloaded.len(), 1);
        assert!(summary.downloaded.contains("index.html"));
        assert!(summary.failed.contains("broken.html"));
        assert!(!root.path().join("broken.html").exists());
    }

    #[tokio::test]
    async fn test_failed_page_is_not_retried_when_rediscovered() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/index.html",
            r#"<a href="gone.html">1</a><a href="other.html">2</a>"#,
        )
        .await;
        mount_page(&server, "/other.html", r#"<a href="gone.html">again</a>"#).await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let summary = crawl_site(&fetcher, &seeds(&["index.html"]), root.path(), quiet())
            .await
            .unwrap();

        assert!(summary.failed.contains("gone.html"));
        let requests = server.received_requests().await.unwrap();
        let gone_hits = requests
            .iter()
            .filter(|r| r.url.path() == "/gone.html")
            .count();
        assert_eq!(gone_hits, 1);
    }

    #[tokio::test]
    async fn test_duplicate_and_external_seeds() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", "<html></html>").await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let summary = crawl_site(
            &fetcher,
            &seeds(&["index.html", "index.html#top", "https://elsewhere.org/index.html"]),
            root.path(),
            quiet(),
        )
        .await
        .unwrap();

        assert_eq!(summary.downloaded.len(), 1);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_raised_interrupt_stops_before_fetching() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", "<html></html>").await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let (handle, interrupt) = Interrupt::new();
        handle.raise();

        let result = crawl_site(&fetcher, &seeds(&["index.html"]), root.path(), interrupt).await;

        assert_eq!(result.unwrap_err(), Interrupted);
        assert!(server.received_requests().await.unwrap().is_empty());
        assert!(!root.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn test_interrupt_abandons_slow_fetch_but_keeps_finished_files() {
        let server = MockServer::start().await;
        mount_page(&server, "/index.html", r#"<a href="slow.html">slow</a>"#).await;
        Mock::given(method("GET"))
            .and(path("/slow.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(std::time::Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(&server.uri(), true, None).unwrap();
        let (handle, interrupt) = Interrupt::new();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            handle.raise();
        });

        let started = std::time::Instant::now();
        let result = crawl_site(&fetcher, &seeds(&["index.html"]), root.path(), interrupt).await;

        assert_eq!(result.unwrap_err(), Interrupted);
        assert!(started.elapsed() < std::time::Duration::from_secs(3));
        // The page written before the interrupt is complete, the slow one never started
        assert_eq!(
            std::fs::read_to_string(root.path().join("index.html")).unwrap(),
            r#"<a href="slow.html">slow</a>"#
        );
        assert!(!root.path().join("slow.html").exists());
    }
}
