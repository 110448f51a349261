//! Runtime settings resolved from command-line flags, environment and defaults.
//!
//! Precedence, highest first:
//!
//! 1. `--api-url` / `--data-dir` flags (`--api-url` wins if both are given)
//! 2. `PROMPT_CATALOG_API_URL` / `PROMPT_CATALOG_DATA_DIR`
//! 3. the platform data directory (`~/.local/share/prompt-catalog` on Linux)

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::browser::DEFAULT_DEBOUNCE;
use crate::cache::CachedProvider;
use crate::provider::{DataProvider, FileProvider, HttpProvider};
use crate::utils::environment::DATA_DIR_ENV;
use crate::utils::{format_path_with_tilde, get_api_url, get_data_dir, get_log_path};

/// Upper bound on the configurable debounce delay
const MAX_DEBOUNCE_MS: u64 = 5_000;

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Catalog directory containing categories.json and prompts/
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Catalog API base URL (takes precedence over --data-dir)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Delay between the last keystroke and a content search
    #[arg(long, global = true, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Log file for the interactive browser
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log more (repeat for trace output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Where catalog data comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Directory(PathBuf),
    Api(String),
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Directory(path) => write!(f, "{}", format_path_with_tilde(path)),
            CatalogSource::Api(url) => write!(f, "{}", url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source: CatalogSource,
    pub debounce: Duration,
    /// `None` only when no cache directory could be determined
    pub log_file: Option<PathBuf>,
    pub verbose: u8,
}

impl Settings {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let source = match (&args.api_url, &args.data_dir) {
            (Some(url), _) => CatalogSource::Api(url.clone()),
            (None, Some(dir)) => CatalogSource::Directory(dir.clone()),
            (None, None) => match get_api_url() {
                Some(url) => CatalogSource::Api(url),
                None => CatalogSource::Directory(get_data_dir()?),
            },
        };

        let debounce = args
            .debounce_ms
            .map(|ms| Duration::from_millis(ms.min(MAX_DEBOUNCE_MS)))
            .unwrap_or(DEFAULT_DEBOUNCE);

        let log_file = match &args.log_file {
            Some(path) => Some(path.clone()),
            None => get_log_path().ok(),
        };

        Ok(Self { source, debounce, log_file, verbose: args.verbose })
    }

    /// Build the session's provider: the configured source behind a cache
    pub fn open_provider(&self) -> Result<Arc<dyn DataProvider>> {
        let provider: Arc<dyn DataProvider> = match &self.source {
            CatalogSource::Directory(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!(
                        "Catalog directory not found: {} (set --data-dir or {})",
                        format_path_with_tilde(dir),
                        DATA_DIR_ENV
                    );
                }
                Arc::new(CachedProvider::new(FileProvider::new(dir.clone())))
            }
            CatalogSource::Api(url) => Arc::new(CachedProvider::new(HttpProvider::new(url)?)),
        };
        Ok(provider)
    }
}
