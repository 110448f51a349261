use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the catalog directory
pub const DATA_DIR_ENV: &str = "PROMPT_CATALOG_DATA_DIR";
/// Environment variable selecting an HTTP catalog instead of a directory
pub const API_URL_ENV: &str = "PROMPT_CATALOG_API_URL";

/// Get the catalog directory: `$PROMPT_CATALOG_DATA_DIR`, else the platform
/// data directory (`~/.local/share/prompt-catalog` on Linux)
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = non_empty_var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    let base = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(base.join("prompt-catalog"))
}

/// Get the catalog API base URL if one is configured in the environment
pub fn get_api_url() -> Option<String> {
    non_empty_var(API_URL_ENV)
}

/// Default log file location for the interactive browser
pub fn get_log_path() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Failed to get platform cache directory")?;
    Ok(base.join("prompt-catalog").join("prompt-catalog.log"))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
