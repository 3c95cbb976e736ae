// src/pipeline.rs
// =============================================================================
// One complete run: mirror the site, package it, clean up.
//
// 1. Build the HTTP client and a fresh scratch directory
// 2. Crawl from the seeds into the scratch directory
// 3. Zip the scratch directory into the output JAR (on a blocking thread)
// 4. Delete the scratch directory
//
// Steps 1-3 watch a shutdown future (Ctrl-C in production). When it fires the
// steps are told to stop through an Interrupt and then awaited, never just
// dropped, so no write is still in flight when step 4 runs. Whichever way
// steps 1-3 end (success, nothing downloaded, archive failure, interruption),
// step 4 still runs.
// =============================================================================

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::archive::{create_jar, remove_temp_dir, ArchiveError};
use crate::config::Config;
use crate::crawl::{crawl_site, FetchError, Fetcher};
use crate::interrupt::{Interrupt, Interrupted};
use crate::report::RunReport;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Client(#[from] FetchError),

    #[error("cannot prepare temporary directory {path}: {source}")]
    TempDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download javadoc files ({failed} failed, none succeeded)")]
    NothingDownloaded { failed: usize },

    #[error("failed to create JAR file: {0}")]
    Archive(ArchiveError),

    #[error("archive task stopped unexpectedly: {0}")]
    ArchiveTask(#[from] tokio::task::JoinError),

    #[error("interrupted by user")]
    Interrupted,
}

impl From<ArchiveError> for PipelineError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Interrupted => PipelineError::Interrupted,
            other => PipelineError::Archive(other),
        }
    }
}

impl From<Interrupted> for PipelineError {
    fn from(_: Interrupted) -> Self {
        PipelineError::Interrupted
    }
}

// Runs the whole pipeline until it finishes or `shutdown` resolves
//
// The scratch directory is removed afterwards in every case.
pub async fn run<F>(config: &Config, shutdown: F) -> Result<RunReport, PipelineError>
where
    F: Future<Output = ()>,
{
    let (handle, interrupt) = Interrupt::new();
    let work = build_jar(config, interrupt);
    tokio::pin!(work);

    let result = tokio::select! {
        result = &mut work => result,
        _ = shutdown => {
            warn!("Interrupted, waiting for the current step to stop");
            handle.raise();
            work.await
        }
    };

    if let Err(e) = remove_temp_dir(&config.temp_dir) {
        warn!(path = %config.temp_dir.display(), error = %e, "Failed to remove temporary directory");
    }

    result
}

async fn build_jar(config: &Config, interrupt: Interrupt) -> Result<RunReport, PipelineError> {
    let fetcher = Fetcher::new(&config.base_url, config.accept_invalid_certs, config.timeout)?;

    prepare_temp_dir(config).await?;

    let crawl = crawl_site(&fetcher, &config.seeds, &config.temp_dir, interrupt.clone()).await?;
    info!(
        downloaded = crawl.downloaded.len(),
        failed = crawl.failed.len(),
        "Crawl finished"
    );

    if crawl.downloaded.is_empty() {
        return Err(PipelineError::NothingDownloaded {
            failed: crawl.failed.len(),
        });
    }

    let root = config.temp_dir.clone();
    let output = config.output.clone();
    let archive =
        tokio::task::spawn_blocking(move || create_jar(&root, &output, &interrupt)).await??;

    Ok(RunReport::new(&config.base_url, crawl, archive))
}

// Leftovers from an earlier interrupted run would otherwise end up in the JAR
async fn prepare_temp_dir(config: &Config) -> Result<(), PipelineError> {
    let temp_err = |source: std::io::Error| PipelineError::TempDir {
        path: config.temp_dir.clone(),
        source,
    };

    if remove_temp_dir(&config.temp_dir).map_err(temp_err)? {
        info!(path = %config.temp_dir.display(), "Cleared stale temporary directory");
    }

    tokio::fs::create_dir_all(&config.temp_dir)
        .await
        .map_err(temp_err)
}
