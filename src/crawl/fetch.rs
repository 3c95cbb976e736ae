// src/crawl/fetch.rs
// =============================================================================
// This module downloads one documentation file and mirrors it to disk.
//
// For a site-relative path like "processing/core/PApplet.html" it:
// 1. GETs {base_url}/processing/core/PApplet.html
// 2. Treats any non-2xx status as a failure
// 3. Creates {root}/processing/core/ if needed       (write_mirror)
// 4. Writes the body to {root}/processing/core/PApplet.html
//
// A failure never leaves a file behind: whatever is on disk under the root is
// exactly what downloaded successfully, which is what ends up in the JAR.
// =============================================================================

use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client itself could not be built (bad TLS setup, etc.)
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Network-level failure: DNS, connection refused, TLS, timeout
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// The body could not be written to the mirror
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads site-relative paths from one base URL.
pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    // Builds the shared client
    //
    // Parameters:
    //   base_url: site root, without a trailing slash
    //   accept_invalid_certs: skip TLS peer verification for every request
    //   timeout: optional per-request timeout
    pub fn new(
        base_url: &str,
        accept_invalid_certs: bool,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .user_agent(concat!("javadoc-jar/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(accept_invalid_certs);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a site-relative path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // Fetches `path` from the site
    //
    // Only network work happens here, so the crawl loop may abandon this
    // future at any point without leaving anything on disk.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        Ok(body.to_vec())
    }
}

// Writes a fetched body to {root}/{path}, creating parent directories
//
// Callers must await this to completion: the tokio::fs calls run on the
// blocking pool and keep going even if the future is dropped.
pub async fn write_mirror(root: &Path, path: &str, body: &[u8]) -> Result<(), FetchError> {
    let local_path = root.join(path);
    let io_err = |source: std::io::Error| FetchError::Io {
        path: local_path.clone(),
        source,
    };

    if let Some(parent) = local_path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    if let Err(source) = tokio::fs::write(&local_path, body).await {
        // Don't let a half-written file sneak into the archive
        let _ = tokio::fs::remove_file(&local_path).await;
        return Err(io_err(source));
    }

    debug!(path = %local_path.display(), bytes = body.len(), "Wrote file");
    Ok(())
}
