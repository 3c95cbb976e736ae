// src/config.rs
// =============================================================================
// Run configuration: the built-in defaults plus validation of CLI overrides.
//
// The defaults reproduce the Processing 4 javadoc mirror:
//   base URL:  https://processing.github.io/processing4-javadocs
//   scratch:   temp_javadoc/
//   output:    core-4.4.8-javadoc.jar
// =============================================================================

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::cli::Cli;

pub const DEFAULT_BASE_URL: &str = "https://processing.github.io/processing4-javadocs";
pub const DEFAULT_TEMP_DIR: &str = "temp_javadoc";
pub const DEFAULT_OUTPUT: &str = "core-4.4.8-javadoc.jar";

/// Known entry points of the Processing javadoc tree.
pub const DEFAULT_SEEDS: &[&str] = &[
    "index.html",
    "overview-summary.html",
    "overview-tree.html",
    "deprecated-list.html",
    "index-all.html",
    "help-doc.html",
    "stylesheet.css",
    "script.js",
    "processing/core/package-summary.html",
    "processing/core/PApplet.html",
    "processing/core/PGraphics.html",
    "processing/core/PImage.html",
    "processing/core/PVector.html",
    "processing/core/PShape.html",
    "processing/core/PFont.html",
    "processing/data/package-summary.html",
    "processing/event/package-summary.html",
    "processing/opengl/package-summary.html",
    "processing/awt/package-summary.html",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("refusing to use '{0}' as the scratch directory; it is deleted after every run")]
    UnsafeTempDir(PathBuf),

    #[error("output '{output}' lies inside the scratch directory '{temp_dir}'")]
    OutputInsideTempDir { output: PathBuf, temp_dir: PathBuf },

    #[error("no seed pages to start from")]
    NoSeeds,
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// Site root without a trailing slash.
    pub base_url: String,
    pub output: PathBuf,
    pub temp_dir: PathBuf,
    pub seeds: Vec<String>,
    /// Disables TLS peer verification for every request.
    pub accept_invalid_certs: bool,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            temp_dir: PathBuf::from(DEFAULT_TEMP_DIR),
            seeds: DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect(),
            accept_invalid_certs: true,
            timeout: None,
        }
    }
}

impl Config {
    /// Builds a validated config from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let seeds = if cli.seeds.is_empty() {
            DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect()
        } else {
            cli.seeds.clone()
        };

        let config = Self {
            base_url: cli.base_url.trim_end_matches('/').to_string(),
            output: cli.output.clone(),
            temp_dir: cli.temp_dir.clone(),
            seeds,
            accept_invalid_certs: cli.accept_invalid_certs,
            timeout: (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs)),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        if !is_safe_temp_dir(&self.temp_dir) {
            return Err(ConfigError::UnsafeTempDir(self.temp_dir.clone()));
        }

        if lexically_inside(&self.output, &self.temp_dir) {
            return Err(ConfigError::OutputInsideTempDir {
                output: self.output.clone(),
                temp_dir: self.temp_dir.clone(),
            });
        }

        if self.seeds.is_empty() {
            return Err(ConfigError::NoSeeds);
        }

        Ok(())
    }
}

// The scratch directory is removed with remove_dir_all, so it must name an
// actual subdirectory: not "", ".", "..", "/" or a drive root.
fn is_safe_temp_dir(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(_)))
        && !path.components().any(|c| matches!(c, Component::ParentDir))
}

fn lexically_inside(path: &Path, dir: &Path) -> bool {
    fn strip(p: &Path) -> Vec<Component<'_>> {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    let path = strip(path);
    let dir = strip(dir);
    path.len() > dir.len() && path.starts_with(&dir)
}
