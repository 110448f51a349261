//! Copying prompt templates to the system clipboard.
//!
//! The browser and the `copy` command both go through [`ClipboardProvider`],
//! so tests can swap in a recording double instead of touching the system
//! clipboard.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Maximum clipboard size (10MB)
pub const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Destination for copied text
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via arboard.
///
/// The platform clipboard is opened per copy rather than held open, so a
/// session started without a display can still copy once one appears.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// Validates clipboard text without accessing any clipboard
pub fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        anyhow::bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        anyhow::bail!(
            "Text too large for clipboard ({} bytes, max {})",
            text.len(),
            MAX_CLIPBOARD_SIZE
        );
    }

    Ok(())
}

/// Validate, then hand the text to `provider`
pub fn copy_with_provider(text: &str, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(text)?;
    provider.set_text(text)
}

/// Copy text to the system clipboard.
///
/// # Errors
/// Returns error if:
/// - Text is empty
/// - Text is too large for clipboard (>10MB)
/// - Clipboard is locked, denied or unavailable (headless environment)
///
/// # Platform Support
/// - macOS: pasteboard API
/// - Linux: X11 or Wayland
/// - Windows: native clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    copy_with_provider(text, &mut SystemClipboard)
}
