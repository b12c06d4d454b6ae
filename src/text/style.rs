//! Composing styled fragments.
//!
//! Styles are opaque SGR strings supplied by the caller (usually through a
//! [`Palette`](crate::theme::Palette)). They are emitted verbatim; only the
//! text they wrap is sanitized.

use std::io::{self, Write};

use super::ansi::sanitize;

/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";

/// Wrap untrusted `text` in `style` and a reset.
///
/// An empty style produces the sanitized text alone.
pub fn paint(text: &str, style: &str) -> String {
    let text = sanitize(text);
    if style.is_empty() {
        return text.into_owned();
    }
    let mut out = String::with_capacity(style.len() + text.len() + RESET.len());
    out.push_str(style);
    out.push_str(&text);
    out.push_str(RESET);
    out
}

/// Write already-sanitized `text` wrapped in `style`.
pub fn paint_into<W: Write>(w: &mut W, text: &str, style: &str) -> io::Result<()> {
    if style.is_empty() {
        return w.write_all(text.as_bytes());
    }
    w.write_all(style.as_bytes())?;
    w.write_all(text.as_bytes())?;
    w.write_all(RESET.as_bytes())
}
