//! Glyph and escape-sequence utilities.
//!
//! - **Width**: [`visible_width`] measures what a string occupies on screen
//! - **Stripping**: [`strip_ansi`] removes styling from trusted text
//! - **Sanitizing**: [`sanitize`] / [`Sanitizer`] neutralize untrusted text
//! - **Styling**: [`paint`] wraps text in an opaque SGR style
//! - **Truncation**: [`truncate_text`] cuts at grapheme boundaries
//!
//! Built on `unicode-width` (East Asian Width tables) and
//! `unicode-segmentation` (UAX #29 grapheme clusters).

mod ansi;
mod style;
mod truncate;
mod width;

pub use ansi::{is_control, sanitize, sanitized_width_before, strip_ansi, Sanitizer};
pub use style::{paint, paint_into, RESET};
pub use truncate::truncate_text;
pub use width::{char_width, grapheme_width, visible_width};
