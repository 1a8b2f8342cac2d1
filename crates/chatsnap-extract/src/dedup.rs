//! Paragraph-level deduplication within a single message.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static ANY_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Comparison key for a block: whitespace collapsed, trimmed, lowercased.
fn block_key(block: &str) -> String {
    ANY_WS.replace_all(block, " ").trim().to_lowercase()
}

/// Drop repeated blank-line-separated blocks, keeping first occurrences.
///
/// Blocks whose key is empty are dropped as well. Survivors are trimmed and
/// rejoined with a single blank line.
pub fn dedupe_text_blocks(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut out: Vec<&str> = Vec::new();

    for block in BLOCK_BOUNDARY.split(text) {
        let key = block_key(block);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(block.trim());
    }

    out.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_occurrence_order() {
        assert_eq!(dedupe_text_blocks("A\n\nB\n\nA\n\nC"), "A\n\nB\n\nC");
    }

    #[test]
    fn test_comparison_ignores_case_and_whitespace() {
        let text = "Hello   World\n\nhello world\n\n  HELLO\tWORLD  ";
        assert_eq!(dedupe_text_blocks(text), "Hello   World");
    }

    #[test]
    fn test_splits_on_whitespace_only_lines() {
        assert_eq!(dedupe_text_blocks("one\n   \ntwo\n\t\n\none"), "one\n\ntwo");
    }

    #[test]
    fn test_drops_empty_blocks() {
        assert_eq!(dedupe_text_blocks("\n\n\n\nx\n\n\n\n"), "x");
        assert_eq!(dedupe_text_blocks(""), "");
        assert_eq!(dedupe_text_blocks("   "), "");
    }

    #[test]
    fn test_single_newlines_stay_inside_a_block() {
        let text = "line1\nline2\n\nline1\nline2";
        assert_eq!(dedupe_text_blocks(text), "line1\nline2");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "A\n\nB\n\nA\n\nC",
            "  x  \n\n\n y\n\nX",
            "fn main() {\n    body\n}\n\nfn main() {\n    body\n}",
            "",
        ];
        for s in samples {
            let once = dedupe_text_blocks(s);
            assert_eq!(dedupe_text_blocks(&once), once, "not idempotent for {:?}", s);
        }
    }
}
