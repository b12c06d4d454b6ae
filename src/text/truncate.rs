//! Grapheme-safe truncation.
//!
//! Option labels are cut to the terminal width so every option occupies
//! exactly one physical row.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, visible_width};

/// Truncate `text` to at most `max_width` cells, appending `suffix` when cut.
///
/// Never splits a grapheme cluster. `text` must not contain escape
/// sequences (sanitize it first).
pub fn truncate_text(text: &str, max_width: usize, suffix: &str) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let suffix_width = visible_width(suffix);
    if suffix_width >= max_width {
        return take_width(suffix, max_width);
    }

    let mut result = take_width(text, max_width - suffix_width);
    result.push_str(suffix);
    result
}

/// Longest prefix of `text` that fits in `max_width` cells.
fn take_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme_width(grapheme);
        if used + w > max_width {
            break;
        }
        result.push_str(grapheme);
        used += w;
    }
    result
}
