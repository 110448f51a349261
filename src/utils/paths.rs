use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum file size for catalog JSON files: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum identifier length accepted for file lookups
const MAX_IDENTIFIER_LEN: usize = 128;

/// Checks that a catalog identifier is safe to use as a file name
///
/// Identifiers come from the catalog itself or from the command line and end
/// up in paths like `prompts/<id>.json`, so only ASCII alphanumerics, `-`,
/// `_` and `.` are accepted, and `.`/`..` are rejected outright.
///
/// # Examples
///
/// ```
/// use prompt_catalog::utils::paths::is_safe_identifier;
///
/// assert!(is_safe_identifier("code-review_v2"));
/// assert!(!is_safe_identifier("../etc/passwd"));
/// ```
pub fn is_safe_identifier(id: &str) -> bool {
    if id.is_empty() || id.len() > MAX_IDENTIFIER_LEN || id == "." || id == ".." {
        return false;
    }

    id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 10MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use prompt_catalog::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/prompts");
/// // Returns "~/prompts" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    // Avoid double allocation when converting Cow to String
    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
