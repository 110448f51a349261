//! Prompt Catalog - browse, search and copy reusable prompt templates
//!
//! A catalog is a set of categories, each holding prompt templates. This
//! library provides:
//!
//! - Data providers for a catalog directory of JSON files or a catalog HTTP API
//! - A session cache in front of either provider
//! - The browsing state machine (navigation, debounced search, detail overlay)
//!   with stale-response protection
//! - An interactive terminal browser and one-shot CLI commands
//!
//! # Example
//!
//! ```no_run
//! use prompt_catalog::{CachedProvider, DataProvider, FileProvider};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let provider = CachedProvider::new(FileProvider::new("/srv/prompt-catalog"));
//! for result in provider.search("review").await? {
//!     println!("{} ({})", result.prompt.title, result.category_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod cache;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod logging;
pub mod models;
pub mod provider;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use browser::{Browser, Command, Outcome, Screen};
pub use cache::CachedProvider;
pub use clipboard::copy_to_clipboard;
pub use models::{Category, PromptDetail, PromptSummary, SearchResult};
pub use provider::{DataProvider, FileProvider, HttpProvider, ProviderError};
pub use utils::format_path_with_tilde;
