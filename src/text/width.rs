//! Display width of terminal text.
//!
//! All layout arithmetic in the renderer goes through [`visible_width`]:
//! escape sequences count as zero columns, wide East Asian characters and
//! emoji sequences count as two, combining marks as zero.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use super::ansi::{is_control, strip_ansi};

/// Display width of a single codepoint in terminal cells.
#[inline]
pub fn char_width(c: char) -> usize {
    if is_control(c) {
        return 0;
    }
    match c as u32 {
        // Emoji blocks that terminals draw two cells wide
        0x1F300..=0x1F64F | 0x1F680..=0x1F6FF | 0x1F900..=0x1F9FF | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0),
    }
}

/// Display width of a grapheme cluster in terminal cells.
///
/// - `é` (e + combining acute) → 1
/// - `👨‍👩‍👧` (ZWJ sequence) → 2
/// - `🇺🇸` (regional indicator pair) → 2
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return 0,
    };

    if grapheme.len() == first.len_utf8() {
        return char_width(first);
    }

    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    for c in chars {
        match c as u32 {
            0x200D | 0xFE0F | 0x20E3 => return 2,
            0x1F3FB..=0x1F3FF => return 2,
            _ => {}
        }
    }

    char_width(first)
}

/// Number of terminal columns `text` occupies once printed.
///
/// Escape sequences and other controls are zero-width.
pub fn visible_width(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    if text.is_ascii() && !text.as_bytes().contains(&0x1B) {
        return text.bytes().filter(|&b| (0x20..0x7F).contains(&b)).count();
    }

    let stripped = strip_ansi(text);
    stripped.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii() {
        assert_eq!(visible_width("hello"), 5);
        assert_eq!(visible_width(""), 0);
    }

    #[test]
    fn controls_are_zero_width() {
        assert_eq!(visible_width("a\tb\x7f"), 2);
        assert_eq!(char_width('\u{9b}'), 0);
    }

    #[test]
    fn escapes_are_zero_width() {
        assert_eq!(visible_width("\x1b[1;31mred\x1b[0m"), 3);
        assert_eq!(visible_width("\x1b]8;;http://a\x07link\x1b]8;;\x07"), 4);
    }

    #[test]
    fn wide_characters() {
        assert_eq!(visible_width("你好"), 4);
        assert_eq!(visible_width("ｱ"), 1);
        assert_eq!(visible_width("🚀"), 2);
    }

    #[test]
    fn combining_marks() {
        assert_eq!(visible_width("cafe\u{0301}"), 4);
        assert_eq!(grapheme_width("e\u{0301}"), 1);
    }

    #[test]
    fn emoji_sequences() {
        assert_eq!(grapheme_width("👨\u{200D}👩\u{200D}👧"), 2);
        assert_eq!(grapheme_width("🇺🇸"), 2);
        assert_eq!(grapheme_width("👍🏽"), 2);
    }
}
