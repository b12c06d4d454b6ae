//! Cursor-addressed text buffer.
//!
//! [`EditorBuffer`] backs the input widget and the filter of the selection
//! widgets. It holds one or more lines of characters and a cursor that
//! always addresses a valid `(line, column)` pair with
//! `column <= line length`.
//!
//! Every operation that actually changes the buffer (or moves the cursor)
//! reports an [`Event`] through the [`Dispatcher`] before returning, and
//! returns `true`. Operations that cannot apply (a limit would be exceeded,
//! nothing left to delete, already at the edge) return `false` and leave
//! the buffer untouched; widgets turn that into a bell.

use crate::events::{Dispatcher, Event};
use crate::text::{char_width, sanitized_width_before};

/// Runes that end a word for [`EditorBuffer::jump_word`], besides whitespace.
pub const DEFAULT_BOUNDARIES: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Cursor movement by one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Hard limits on buffer size. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorLimits {
    /// Maximum characters, line breaks included.
    pub chars: Option<usize>,
    /// Maximum number of lines.
    pub lines: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct EditorBuffer {
    lines: Vec<Vec<char>>,
    line: usize,
    column: usize,
    multiline: bool,
    limits: EditorLimits,
    indent: usize,
    boundaries: Vec<char>,
}

impl EditorBuffer {
    /// Empty buffer. Single-line buffers refuse line breaks.
    pub fn new(multiline: bool) -> Self {
        Self {
            lines: vec![Vec::new()],
            line: 0,
            column: 0,
            multiline,
            limits: EditorLimits::default(),
            indent: 4,
            boundaries: DEFAULT_BOUNDARIES.chars().collect(),
        }
    }

    pub fn single_line() -> Self {
        Self::new(false)
    }

    pub fn multi_line() -> Self {
        Self::new(true)
    }

    pub fn with_limits(mut self, limits: EditorLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Spaces inserted by [`indent`](EditorBuffer::indent).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Replace the non-whitespace word boundary runes.
    pub fn with_boundaries(mut self, boundaries: &str) -> Self {
        self.boundaries = boundaries.chars().collect();
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Buffer contents, lines joined with `\n`.
    pub fn value(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }

    /// Length in characters, line breaks included.
    pub fn len(&self) -> usize {
        self.lines.iter().map(Vec::len).sum::<usize>() + self.lines.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<String> {
        self.lines.get(index).map(|l| l.iter().collect())
    }

    /// All lines as strings.
    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.iter().collect()).collect()
    }

    /// Cursor as `(line, column)`, column counted in characters.
    pub fn cursor(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Cursor column in screen columns, as the line is displayed once sanitized.
    pub fn cursor_display_column(&self) -> usize {
        let line: String = self.lines[self.line].iter().collect();
        sanitized_width_before(&line, self.column)
    }

    pub fn is_at_end(&self) -> bool {
        self.line + 1 == self.lines.len() && self.column == self.lines[self.line].len()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Insert at the cursor and move the cursor past the inserted text.
    ///
    /// Refused as a whole (nothing inserted) when the text is empty, when a
    /// single-line buffer gets a line break, or when a limit would be exceeded.
    pub fn insert(&mut self, text: &str, events: &mut Dispatcher<'_>) -> bool {
        if text.is_empty() {
            return false;
        }
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let breaks = text.matches('\n').count();
        if breaks > 0 && !self.multiline {
            return false;
        }
        let added = text.chars().count();
        if self.limits.chars.is_some_and(|limit| self.len() + added > limit) {
            return false;
        }
        if self.limits.lines.is_some_and(|limit| self.lines.len() + breaks > limit) {
            return false;
        }

        let tail = self.lines[self.line].split_off(self.column);
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.lines[self.line].extend(first.chars());
            self.column += first.chars().count();
        }
        for piece in pieces {
            self.line += 1;
            let chars: Vec<char> = piece.chars().collect();
            self.column = chars.len();
            self.lines.insert(self.line, chars);
        }
        self.lines[self.line].extend(tail);

        let len = self.len();
        events.emit(Event::Insert { text, len });
        true
    }

    /// Remove the character before the cursor, joining lines at a line start.
    pub fn delete_backward(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if self.column > 0 {
            self.column -= 1;
            self.lines[self.line].remove(self.column);
        } else if self.line > 0 {
            let current = self.lines.remove(self.line);
            self.line -= 1;
            self.column = self.lines[self.line].len();
            self.lines[self.line].extend(current);
        } else {
            return false;
        }
        let len = self.len();
        events.emit(Event::Delete { len });
        true
    }

    /// Remove the character under the cursor, joining lines at a line end.
    pub fn delete_forward(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if self.column < self.lines[self.line].len() {
            self.lines[self.line].remove(self.column);
        } else if self.line + 1 < self.lines.len() {
            let next = self.lines.remove(self.line + 1);
            self.lines[self.line].extend(next);
        } else {
            return false;
        }
        let len = self.len();
        events.emit(Event::Delete { len });
        true
    }

    /// Empty the buffer.
    pub fn clear(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if self.is_empty() {
            return false;
        }
        self.lines = vec![Vec::new()];
        self.line = 0;
        self.column = 0;
        events.emit(Event::Delete { len: 0 });
        true
    }

    /// Drop the last `count` lines if they are all empty.
    pub fn trim_trailing_lines(&mut self, count: usize, events: &mut Dispatcher<'_>) -> bool {
        if count == 0 || self.lines.len() <= count {
            return false;
        }
        let start = self.lines.len() - count;
        if !self.lines[start..].iter().all(Vec::is_empty) {
            return false;
        }
        self.lines.truncate(start.max(1));
        if self.line >= self.lines.len() {
            self.line = self.lines.len() - 1;
            self.column = self.lines[self.line].len();
        }
        let len = self.len();
        events.emit(Event::Delete { len });
        true
    }

    /// Insert spaces standing in for a tab. Multi-line buffers only.
    pub fn indent(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if !self.multiline || self.indent == 0 {
            return false;
        }
        let spaces = " ".repeat(self.indent);
        if !self.insert(&spaces, events) {
            return false;
        }
        events.emit(Event::Indent { size: self.indent });
        true
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Move one position. Left/Right cross line boundaries; Up/Down keep the
    /// screen column where the target line is long enough. Up on the first
    /// line goes to its start and Down on the last line goes to its end.
    pub fn move_cursor(&mut self, direction: Direction, events: &mut Dispatcher<'_>) -> bool {
        let moved = match direction {
            Direction::Left => {
                if self.column > 0 {
                    self.column -= 1;
                    true
                } else if self.line > 0 {
                    self.line -= 1;
                    self.column = self.lines[self.line].len();
                    true
                } else {
                    false
                }
            }
            Direction::Right => {
                if self.column < self.lines[self.line].len() {
                    self.column += 1;
                    true
                } else if self.line + 1 < self.lines.len() {
                    self.line += 1;
                    self.column = 0;
                    true
                } else {
                    false
                }
            }
            Direction::Up if self.multiline => {
                if self.line > 0 {
                    let visual = self.visual_column();
                    self.line -= 1;
                    self.column = self.column_at_visual(visual);
                    true
                } else if self.column > 0 {
                    self.column = 0;
                    true
                } else {
                    false
                }
            }
            Direction::Down if self.multiline => {
                if self.line + 1 < self.lines.len() {
                    let visual = self.visual_column();
                    self.line += 1;
                    self.column = self.column_at_visual(visual);
                    true
                } else if self.column < self.lines[self.line].len() {
                    self.column = self.lines[self.line].len();
                    true
                } else {
                    false
                }
            }
            Direction::Up | Direction::Down => false,
        };

        if moved {
            let event = match direction {
                Direction::Left => Event::MoveX { left: true },
                Direction::Right => Event::MoveX { left: false },
                Direction::Up => Event::MoveY { up: true },
                Direction::Down => Event::MoveY { up: false },
            };
            events.emit(event);
        }
        moved
    }

    /// Move to the start of the current line.
    pub fn home(&mut self, events: &mut Dispatcher<'_>) -> bool {
        if self.column == 0 {
            return false;
        }
        self.column = 0;
        events.emit(Event::MoveX { left: true });
        true
    }

    /// Move to the end of the current line.
    pub fn end(&mut self, events: &mut Dispatcher<'_>) -> bool {
        let len = self.lines[self.line].len();
        if self.column == len {
            return false;
        }
        self.column = len;
        events.emit(Event::MoveX { left: false });
        true
    }

    /// Jump just past the next boundary rune in the given direction, or to
    /// the start/end of the buffer when there is none. Line breaks count as
    /// boundaries. A no-op at the buffer edge it moves towards.
    pub fn jump_word(&mut self, left: bool, events: &mut Dispatcher<'_>) -> bool {
        let flat: Vec<char> = self.value().chars().collect();
        let here = self.flat_index();

        let target = if left {
            if here == 0 {
                return false;
            }
            (0..here - 1)
                .rev()
                .find(|&i| self.is_boundary(flat[i]))
                .map_or(0, |i| i + 1)
        } else {
            if here == flat.len() {
                return false;
            }
            (here..flat.len())
                .find(|&i| self.is_boundary(flat[i]))
                .map_or(flat.len(), |i| i + 1)
        };

        self.set_flat_index(target);
        events.emit(Event::JumpX { left });
        true
    }

    fn is_boundary(&self, c: char) -> bool {
        c.is_whitespace() || self.boundaries.contains(&c)
    }

    fn flat_index(&self) -> usize {
        self.lines[..self.line].iter().map(|l| l.len() + 1).sum::<usize>() + self.column
    }

    fn set_flat_index(&mut self, mut index: usize) {
        for (line, chars) in self.lines.iter().enumerate() {
            if index <= chars.len() {
                self.line = line;
                self.column = index;
                return;
            }
            index -= chars.len() + 1;
        }
        self.line = self.lines.len() - 1;
        self.column = self.lines[self.line].len();
    }

    fn visual_column(&self) -> usize {
        self.lines[self.line][..self.column].iter().map(|&c| char_width(c)).sum()
    }

    /// Largest column on the current line whose screen offset is <= `visual`.
    fn column_at_visual(&self, visual: usize) -> usize {
        let mut width = 0;
        for (i, &c) in self.lines[self.line].iter().enumerate() {
            width += char_width(c);
            if width > visual {
                return i;
            }
        }
        self.lines[self.line].len()
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::single_line()
    }
}
