//! Terminal output sanitization for catalog text.
//!
//! Catalog files (or a remote catalog API) are not trusted: prompt titles,
//! descriptions and template bodies could embed escape sequences that clear
//! the screen, move the cursor, retitle the window or restyle the terminal.
//! Everything printed by the CLI or drawn by the browser passes through
//! [`strip_ansi_codes`] or [`single_line`] first. Clipboard copies keep the
//! raw text.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Removes escape sequences and control characters, keeping tab, newline and
/// carriage return.
///
/// Handles CSI sequences (`ESC [ ... final`), OSC sequences (`ESC ] ...`
/// terminated by BEL or `ESC \`) and bare two-character escapes.
///
/// ```
/// use prompt_catalog::utils::terminal::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[1mReview\x1b[0m this"), "Review this");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ESC {
            match chars.next() {
                // CSI: parameters and intermediates end at a byte in '@'..='~'
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('@'..='~').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: runs to BEL or ST (ESC \)
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitized text collapsed onto one line, for list rows and headers
pub fn single_line(text: &str) -> String {
    strip_ansi_codes(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten to at most `max` characters, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
