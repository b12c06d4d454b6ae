//! Wrap arithmetic: where each cell of a frame lands on screen.
//!
//! Positions are `(row, col)` pairs relative to the frame origin (the
//! first column of the row the frame starts on).
//!
//! Rules, matching how terminals auto-wrap:
//! - a cell that does not fit in the rest of the row starts the next row
//!   (a wide character at the last column leaves a one-column gap)
//! - zero-width cells stay where they are
//! - a line whose last cell ends exactly at the right margin owns one more,
//!   empty row: the renderer forces that wrap so the cursor can sit there
//!
//! A line of visible width `w` on narrow text therefore spans
//! `w / width + 1` rows.

use super::frame::{Cell, Cursor};

/// A `(row, col)` screen position.
pub type Position = (usize, usize);

/// Placement of one logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Start position of each cell, relative to the line's first row.
    pub starts: Vec<Position>,
    /// Where the cursor rests after the last cell is written.
    pub end: Position,
    /// The last cell ends at the right margin.
    pub wraps_at_end: bool,
}

impl LineLayout {
    pub fn compute(cells: &[Cell<'_>], width: usize) -> Self {
        let width = width.max(1);
        let mut starts = Vec::with_capacity(cells.len());
        let (mut row, mut col) = (0usize, 0usize);

        for cell in cells {
            if cell.width > 0 && (col >= width || (col > 0 && col + cell.width > width)) {
                row += 1;
                col = 0;
            }
            starts.push((row, col));
            col += cell.width;
        }

        let wraps_at_end = !cells.is_empty() && col >= width;
        let end = if wraps_at_end { (row + 1, 0) } else { (row, col) };
        Self { starts, end, wraps_at_end }
    }

    /// Where the gap in front of cell `index` starts, if that cell wrapped
    /// early and left unused columns at the end of the previous row.
    ///
    /// Terminals never touch those columns, so whatever was there before
    /// stays visible unless it is erased.
    pub fn gap_before(&self, cells: &[Cell<'_>], index: usize, width: usize) -> Option<Position> {
        if index == 0 || index >= cells.len() {
            return None;
        }
        let (row, col) = self.starts[index - 1];
        let end = col + cells[index - 1].width;
        (self.starts[index].0 > row && end < width).then_some((row, end))
    }

    /// Where writing has to start for cell `index` to land in place, with
    /// any gap in front of it included.
    pub fn resume_at(&self, cells: &[Cell<'_>], index: usize, width: usize) -> Position {
        self.gap_before(cells, index, width)
            .or_else(|| self.starts.get(index).copied())
            .unwrap_or(self.end)
    }

    /// Physical rows this line occupies.
    pub fn rows(&self) -> usize {
        self.end.0 + 1
    }

    /// Position of the given visible column within this line.
    ///
    /// Columns past the end map to the end position; a column inside a wide
    /// character maps to that character.
    pub fn position(&self, cells: &[Cell<'_>], column: usize) -> Position {
        let mut offset = 0;
        for (cell, &start) in cells.iter().zip(&self.starts) {
            if offset + cell.width > column || (offset == column && cell.width > 0) {
                return start;
            }
            offset += cell.width;
        }
        self.end
    }
}

/// Placement of a whole frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    pub lines: Vec<LineLayout>,
    /// First row of each line.
    pub origins: Vec<usize>,
}

impl FrameLayout {
    pub fn compute(cells: &[Vec<Cell<'_>>], width: usize) -> Self {
        let mut lines = Vec::with_capacity(cells.len());
        let mut origins = Vec::with_capacity(cells.len());
        let mut row = 0;
        for line in cells {
            let layout = LineLayout::compute(line, width);
            origins.push(row);
            row += layout.rows();
            lines.push(layout);
        }
        Self { lines, origins }
    }

    /// Total physical rows.
    pub fn height(&self) -> usize {
        self.lines.iter().map(LineLayout::rows).sum()
    }

    /// Absolute end position of line `index`.
    pub fn end_of(&self, index: usize) -> Position {
        let (row, col) = self.lines[index].end;
        (self.origins[index] + row, col)
    }

    /// Absolute position of a logical cursor.
    pub fn cursor(&self, cells: &[Vec<Cell<'_>>], cursor: Cursor) -> Position {
        let index = cursor.line.min(self.lines.len().saturating_sub(1));
        match (self.lines.get(index), cells.get(index)) {
            (Some(layout), Some(line)) => {
                let (row, col) = layout.position(line, cursor.column);
                (self.origins[index] + row, col)
            }
            _ => (0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::frame::Line;

    fn layout(text: &str, width: usize) -> LineLayout {
        let line = Line::plain(text);
        LineLayout::compute(&line.cells(), width)
    }

    #[test]
    fn short_line_one_row() {
        let l = layout("hello", 10);
        assert_eq!(l.rows(), 1);
        assert_eq!(l.end, (0, 5));
        assert!(!l.wraps_at_end);
    }

    #[test]
    fn empty_line_one_row() {
        let l = layout("", 10);
        assert_eq!(l.rows(), 1);
        assert_eq!(l.end, (0, 0));
    }

    #[test]
    fn wrapped_line() {
        let l = layout("abcdefghijkl", 5);
        assert_eq!(l.rows(), 3);
        assert_eq!(l.starts[5], (1, 0));
        assert_eq!(l.end, (2, 2));
    }

    #[test]
    fn wide_char_leaves_gap() {
        let line = Line::plain("abcde界");
        let cells = line.cells();
        let l = LineLayout::compute(&cells, 6);
        assert_eq!(l.starts[5], (1, 0));
        assert_eq!(l.gap_before(&cells, 5, 6), Some((0, 5)));
        assert_eq!(l.resume_at(&cells, 5, 6), (0, 5));
        assert_eq!(l.gap_before(&cells, 4, 6), None);
        assert_eq!(l.resume_at(&cells, 6, 6), l.end);
    }

    #[test]
    fn full_row_has_no_gap() {
        let line = Line::plain("abcdef界");
        let cells = line.cells();
        let l = LineLayout::compute(&cells, 6);
        assert_eq!(l.gap_before(&cells, 6, 6), None);
        assert_eq!(l.resume_at(&cells, 6, 6), (1, 0));
    }

    #[test]
    fn exact_multiple_owns_extra_row() {
        let l = layout("abcde", 5);
        assert!(l.wraps_at_end);
        assert_eq!(l.end, (1, 0));
        assert_eq!(l.rows(), 2);
    }

    #[test]
    fn rows_follow_floor_plus_one() {
        for w in 0..30 {
            let text = "x".repeat(w);
            assert_eq!(layout(&text, 7).rows(), w / 7 + 1, "width {w}");
        }
    }

    #[test]
    fn wide_char_at_margin_wraps_early() {
        // 4 narrow + 1 wide at width 5: the wide char cannot start at col 4.
        let l = layout("abcd你", 5);
        assert_eq!(l.starts[4], (1, 0));
        assert_eq!(l.end, (1, 2));
    }

    #[test]
    fn cursor_position_inside_wrapped_line() {
        let line = Line::plain("abcdefgh");
        let cells = line.cells();
        let l = LineLayout::compute(&cells, 5);
        assert_eq!(l.position(&cells, 0), (0, 0));
        assert_eq!(l.position(&cells, 6), (1, 1));
        assert_eq!(l.position(&cells, 8), (1, 3));
        assert_eq!(l.position(&cells, 99), (1, 3));
    }

    #[test]
    fn cursor_position_after_wide_chars() {
        let line = Line::plain("你好");
        let cells = line.cells();
        let l = LineLayout::compute(&cells, 80);
        assert_eq!(l.position(&cells, 2), (0, 2));
        assert_eq!(l.position(&cells, 4), (0, 4));
    }

    #[test]
    fn frame_origins_accumulate() {
        let lines = [Line::plain("abcdefg"), Line::plain("x"), Line::plain("")];
        let cells: Vec<_> = lines.iter().map(Line::cells).collect();
        let f = FrameLayout::compute(&cells, 5);
        assert_eq!(f.origins, vec![0, 2, 3]);
        assert_eq!(f.height(), 4);
        assert_eq!(f.cursor(&cells, Cursor::new(1, 1)), (2, 1));
        assert_eq!(f.end_of(0), (1, 2));
    }
}
