//! Differential inline renderer.
//!
//! Frames are painted in the normal screen buffer, starting at the row the
//! cursor was on when the prompt began. Between two frames only the delta is
//! written:
//!
//! 1. Lines whose physical row count did not change are compared cell by
//!    cell. A changed line is rewritten from its first differing cell; the
//!    tail of the row is erased when the new line ends earlier.
//! 2. From the first line whose row count changed (or that exists in only
//!    one frame), everything is erased and repainted.
//! 3. The cursor is moved to the new frame's cursor target.
//!
//! Positions are relative to the frame origin, so the renderer never asks
//! the terminal where the cursor is. The only state carried between calls
//! is the previous frame and the width it was laid out at.

use std::io::{self, Write};

use tracing::trace;

use super::ansi;
use super::frame::{Cell, Frame, Line};
use super::layout::{FrameLayout, LineLayout, Position};
use super::output::OutputBuffer;

// =============================================================================
// Pure diff
// =============================================================================

/// Write the bytes that turn `prev` into `next` on a terminal `width`
/// columns wide.
///
/// The terminal cursor must be where `prev` left it (or, with no `prev`, at
/// the start of the row the frame begins on). Identical frames produce no
/// output at all.
pub fn diff_frames<W: Write>(prev: Option<&Frame>, next: &Frame, width: usize, out: &mut W) -> io::Result<()> {
    if prev == Some(next) {
        return Ok(());
    }

    let width = width.max(1);
    let next_cells: Vec<Vec<Cell<'_>>> = next.lines().iter().map(Line::cells).collect();
    let next_layout = FrameLayout::compute(&next_cells, width);

    let mut body = Vec::new();
    let mut cur = match prev {
        None => paint_all(&next_cells, &next_layout, width, &mut body)?,
        Some(prev) => paint_delta(prev, &next_cells, &next_layout, width, &mut body)?,
    };

    let target = next_layout.cursor(&next_cells, next.cursor());
    move_to(&mut body, &mut cur, target)?;

    if !body.is_empty() {
        ansi::cursor_hide(out)?;
        out.write_all(&body)?;
        ansi::cursor_show(out)?;
    }
    Ok(())
}

/// First paint: clear from the origin row down and write every line.
fn paint_all(
    cells: &[Vec<Cell<'_>>],
    layout: &FrameLayout,
    width: usize,
    out: &mut Vec<u8>,
) -> io::Result<Position> {
    ansi::carriage_return(out)?;
    ansi::erase_down(out)?;
    for (i, line) in cells.iter().enumerate() {
        if i > 0 {
            ansi::next_line(out)?;
        }
        write_line(out, line, &layout.lines[i], 0, width)?;
    }
    Ok(layout.end_of(cells.len() - 1))
}

fn paint_delta(
    prev: &Frame,
    next_cells: &[Vec<Cell<'_>>],
    next_layout: &FrameLayout,
    width: usize,
    out: &mut Vec<u8>,
) -> io::Result<Position> {
    let prev_cells: Vec<Vec<Cell<'_>>> = prev.lines().iter().map(Line::cells).collect();
    let prev_layout = FrameLayout::compute(&prev_cells, width);
    let mut cur = prev_layout.cursor(&prev_cells, prev.cursor());

    let common = prev_cells.len().min(next_cells.len());
    let stable = (0..common)
        .find(|&i| prev_layout.lines[i].rows() != next_layout.lines[i].rows())
        .unwrap_or(common);

    // Lines keeping their shape: rewrite from the first differing cell.
    for i in 0..stable {
        let (old, new) = (&prev_cells[i], &next_cells[i]);
        if old == new {
            continue;
        }
        let first = old.iter().zip(new.iter()).take_while(|(a, b)| a == b).count();
        let new_layout = &next_layout.lines[i];
        let (row, col) = new_layout.resume_at(new, first, width);
        move_to(out, &mut cur, (next_layout.origins[i] + row, col))?;
        write_line(out, new, new_layout, first, width)?;
        cur = next_layout.end_of(i);

        if prev_layout.lines[i].end > new_layout.end {
            ansi::erase_line_end(out)?;
        }
    }

    let (prev_len, next_len) = (prev_cells.len(), next_cells.len());
    if stable < prev_len && stable < next_len {
        // Shape changed: repaint from this line down.
        move_to(out, &mut cur, (prev_layout.origins[stable], 0))?;
        ansi::erase_down(out)?;
        for i in stable..next_len {
            if i > stable {
                ansi::next_line(out)?;
            }
            write_line(out, &next_cells[i], &next_layout.lines[i], 0, width)?;
        }
        cur = next_layout.end_of(next_len - 1);
    } else if stable < next_len {
        // New lines below an unchanged frame.
        move_to(out, &mut cur, next_layout.end_of(stable - 1))?;
        for i in stable..next_len {
            ansi::next_line(out)?;
            write_line(out, &next_cells[i], &next_layout.lines[i], 0, width)?;
        }
        cur = next_layout.end_of(next_len - 1);
    } else if stable < prev_len {
        // Frame got shorter: erase everything after the last line.
        move_to(out, &mut cur, next_layout.end_of(next_len - 1))?;
        ansi::erase_down(out)?;
    }

    Ok(cur)
}

/// Write `cells[from..]` of one line, switching styles only where they
/// change. The cursor must be at `layout.resume_at(cells, from, width)`.
///
/// Gaps left by wide characters that wrapped early are erased on the way,
/// and a line ending at the right margin gets its wrap forced.
fn write_line<W: Write>(
    out: &mut W,
    cells: &[Cell<'_>],
    layout: &LineLayout,
    from: usize,
    width: usize,
) -> io::Result<()> {
    let mut current = "";
    for (i, cell) in cells.iter().enumerate().skip(from) {
        if layout.gap_before(cells, i, width).is_some() {
            if !current.is_empty() {
                ansi::reset(out)?;
                current = "";
            }
            ansi::erase_line_end(out)?;
        }
        if cell.style != current {
            if !current.is_empty() {
                ansi::reset(out)?;
            }
            out.write_all(cell.style.as_bytes())?;
            current = cell.style;
        }
        out.write_all(cell.grapheme.as_bytes())?;
    }
    if !current.is_empty() {
        ansi::reset(out)?;
    }
    if from < cells.len() && layout.wraps_at_end {
        force_wrap(out)?;
    }
    Ok(())
}

/// The cursor sits in the deferred-wrap state at the right margin; make the
/// wrap happen so the next row exists and the cursor is at its start.
fn force_wrap<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(b" \r")
}

/// Move with relative rows and an absolute column.
fn move_to<W: Write>(out: &mut W, cur: &mut Position, to: Position) -> io::Result<()> {
    if to.0 < cur.0 {
        ansi::cursor_up(out, cur.0 - to.0)?;
    } else if to.0 > cur.0 {
        ansi::cursor_down(out, to.0 - cur.0)?;
    }
    if to.1 != cur.1 {
        ansi::cursor_column(out, to.1)?;
    }
    *cur = to;
    Ok(())
}

// =============================================================================
// DiffRenderer
// =============================================================================

/// Owns the last painted frame.
///
/// Every call takes the current terminal width; a width different from the
/// one the previous frame was laid out at discards that frame and the next
/// paint starts from scratch.
#[derive(Debug, Default)]
pub struct DiffRenderer {
    previous: Option<Frame>,
    width: usize,
    output: OutputBuffer,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self { previous: None, width: 0, output: OutputBuffer::new() }
    }

    /// Whether a frame is currently on screen.
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Forget the previous frame without touching the screen.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Bytes that bring the screen from the previous frame to `frame`.
    pub fn render(&mut self, frame: &Frame, width: u16) -> io::Result<&[u8]> {
        self.output.begin_pass();
        let width = usize::from(width.max(1));
        if self.width != width {
            self.erase_region(width)?;
        }
        diff_frames(self.previous.as_ref(), frame, width, &mut self.output)?;
        trace!(pass = self.output.passes(), bytes = self.output.len(), "frame rendered");
        self.previous = Some(frame.clone());
        self.width = width;
        Ok(self.output.as_bytes())
    }

    /// The terminal is now `width` columns wide: wipe what was painted so
    /// the next [`render`](DiffRenderer::render) repaints in full.
    pub fn resize(&mut self, width: u16) -> io::Result<&[u8]> {
        self.output.begin_pass();
        self.erase_region(usize::from(width.max(1)))?;
        Ok(self.output.as_bytes())
    }

    /// Paint `frame` one last time and leave the cursor on a fresh row
    /// below it. The renderer starts over afterwards.
    pub fn finish(&mut self, frame: &Frame, width: u16) -> io::Result<&[u8]> {
        self.render(frame, width)?;
        let cells: Vec<Vec<Cell<'_>>> = frame.lines().iter().map(Line::cells).collect();
        let layout = FrameLayout::compute(&cells, self.width);
        let mut cur = layout.cursor(&cells, frame.cursor());
        let bottom = layout.end_of(cells.len() - 1);
        move_to(&mut self.output, &mut cur, bottom)?;
        ansi::next_line(&mut self.output)?;
        self.previous = None;
        self.width = 0;
        Ok(self.output.as_bytes())
    }

    /// Erase everything painted and return the cursor to the origin.
    pub fn clear(&mut self, width: u16) -> io::Result<&[u8]> {
        self.resize(width)
    }

    /// Walk back to the frame origin (using `width` to recompute where the
    /// cursor row is) and erase downward.
    fn erase_region(&mut self, width: usize) -> io::Result<()> {
        if let Some(prev) = self.previous.take() {
            let cells: Vec<Vec<Cell<'_>>> = prev.lines().iter().map(Line::cells).collect();
            let layout = FrameLayout::compute(&cells, width);
            let (row, _) = layout.cursor(&cells, prev.cursor());
            ansi::cursor_up(&mut self.output, row)?;
            ansi::carriage_return(&mut self.output)?;
            ansi::erase_down(&mut self.output)?;
        }
        self.width = width;
        Ok(())
    }
}
