//! Frames: immutable snapshots of what a widget wants on screen.
//!
//! A [`Frame`] is a list of logical [`Line`]s, each a list of styled
//! [`Segment`]s, plus a logical [`Cursor`] target. Segment text is sanitized
//! when the segment is built; segment styles are opaque and emitted as-is.
//! Widgets rebuild a frame on every state change; the renderer keeps the
//! last one it painted and diffs the next against it.

use crate::text::{grapheme_width, sanitize, visible_width};
use unicode_segmentation::UnicodeSegmentation;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    style: String,
    text: String,
}

impl Segment {
    /// Unstyled segment. `text` is sanitized.
    pub fn plain(text: &str) -> Self {
        Self::styled(text, "")
    }

    /// Styled segment. `text` is sanitized, `style` is kept verbatim.
    pub fn styled(text: &str, style: &str) -> Self {
        Self { style: style.to_string(), text: sanitize(text).into_owned() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn width(&self) -> usize {
        visible_width(&self.text)
    }
}

/// One logical line. May wrap onto several physical rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    segments: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: &str) -> Self {
        Self::new().with(text, "")
    }

    /// Builder form of [`push`](Line::push).
    pub fn with(mut self, text: &str, style: &str) -> Self {
        self.push(text, style);
        self
    }

    /// Append a segment. Empty text is skipped.
    pub fn push(&mut self, text: &str, style: &str) -> &mut Self {
        if !text.is_empty() {
            self.segments.push(Segment::styled(text, style));
        }
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Visible width in columns.
    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    /// Text without styling.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Split into grapheme cells, the unit the renderer diffs by.
    pub fn cells(&self) -> Vec<Cell<'_>> {
        let mut cells = Vec::new();
        for segment in &self.segments {
            for grapheme in segment.text.graphemes(true) {
                cells.push(Cell {
                    style: &segment.style,
                    grapheme,
                    width: grapheme_width(grapheme),
                });
            }
        }
        cells
    }
}

/// One grapheme and the style it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    pub style: &'a str,
    pub grapheme: &'a str,
    pub width: usize,
}

/// Logical cursor target: a line index and a visible column within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A complete renderable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<Line>,
    cursor: Cursor,
}

impl Frame {
    /// Build a frame. An empty line list becomes one empty line, and the
    /// cursor line is clamped to the last line.
    pub fn new(mut lines: Vec<Line>, cursor: Cursor) -> Self {
        if lines.is_empty() {
            lines.push(Line::new());
        }
        let line = cursor.line.min(lines.len() - 1);
        Self { lines, cursor: Cursor { line, column: cursor.column } }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Unstyled text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Vec::new(), Cursor::default())
    }
}
