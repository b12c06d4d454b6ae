//! Control sequences used by the renderer.
//!
//! Only a baseline subset every VT100-compatible terminal understands:
//! relative cursor movement, absolute column, erase in line/display,
//! cursor visibility and SGR reset.

use std::io::{self, Write};

// =============================================================================
// Cursor Movement
// =============================================================================

/// CUU. Stops at the top row, so frames taller than the screen cannot be
/// walked back in full.
pub fn cursor_up<W: Write>(w: &mut W, rows: usize) -> io::Result<()> {
    match rows {
        0 => Ok(()),
        n => write!(w, "\x1b[{n}A"),
    }
}

/// CUD. Stops at the bottom row; use [`next_line`] to grow the frame.
pub fn cursor_down<W: Write>(w: &mut W, rows: usize) -> io::Result<()> {
    match rows {
        0 => Ok(()),
        n => write!(w, "\x1b[{n}B"),
    }
}

/// CHA, taking a 0-based column.
pub fn cursor_column<W: Write>(w: &mut W, col: usize) -> io::Result<()> {
    write!(w, "\x1b[{}G", col + 1)
}

pub fn carriage_return<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Start of the next row. Scrolls the screen when already on the last row,
/// which is how an inline frame makes room for itself.
pub fn next_line<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\r\n")
}

pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// =============================================================================
// Erasing
// =============================================================================

/// EL 0: a rewritten row may be shorter than what it replaces.
pub fn erase_line_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// ED 0: rows below the cursor.
pub fn erase_down<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

/// SGR 0, written after every styled run.
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}
