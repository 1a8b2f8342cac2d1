//! Whitespace and zero-width cleanup for extracted strings.

use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Normalize a raw string.
///
/// Rules are applied in order: zero-width spaces removed, runs of three or
/// more newlines collapsed to two, runs of spaces/tabs collapsed to one
/// space, then the result is trimmed.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|&c| c != ZERO_WIDTH_SPACE).collect();
    let collapsed = EXCESS_NEWLINES.replace_all(&stripped, "\n\n");
    let spaced = HORIZONTAL_WS.replace_all(&collapsed, " ");
    spaced.trim().to_string()
}
