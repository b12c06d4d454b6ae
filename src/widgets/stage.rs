//! Shared frame pieces: the header row, option rows, the warning row and
//! the one-line summary left behind after a commit.
//!
//! Header layout: `prompt info hint`. The prompt is drawn verbatim in the
//! prompt style; info and hint are each preceded by a space when present.

use crate::renderer::{Cursor, Frame, Line};
use crate::text::{truncate_text, visible_width};
use crate::theme::Theme;

use super::options::OptionSet;

/// Header row, and the column just past the info text (where typed filter
/// text goes).
pub fn header(theme: &Theme, prompt: &str, info: &str, hint: &str) -> (Line, usize) {
    let mut line = Line::new();
    line.push(prompt, &theme.palette.prompt);
    if !info.is_empty() {
        line.push(" ", "");
        line.push(info, &theme.palette.info);
    }
    let column = line.width();
    if !hint.is_empty() {
        line.push(" ", "");
        line.push(hint, &theme.palette.hint);
    }
    (line, column)
}

/// Warning row shown under the body.
pub fn warning(theme: &Theme, text: &str) -> Line {
    Line::new().with(text, &theme.palette.warn)
}

/// One row per option in the visible window, each truncated to `width`
/// so that it never wraps.
pub fn option_rows(options: &OptionSet, theme: &Theme, width: usize, marks: bool) -> Vec<Line> {
    let symbols = &theme.symbols;
    let blank = " ".repeat(visible_width(&symbols.focus));
    let focused = options.focused();

    options
        .window()
        .iter()
        .map(|&index| {
            let is_focused = Some(index) == focused;
            let mut line = Line::new();
            if is_focused {
                line.push(&symbols.focus, &theme.palette.focus);
            } else {
                line.push(&blank, "");
            }
            if marks {
                if options.is_picked(index) {
                    line.push(&symbols.pin, &theme.palette.pick);
                } else {
                    line.push(&symbols.unpin, "");
                }
            }
            let room = width.saturating_sub(line.width() + 1).max(1);
            let label = truncate_text(options.label(index), room, &symbols.ellipsis);
            let style = if is_focused { theme.palette.focus.as_str() } else { "" };
            line.push(&label, style);
            line
        })
        .collect()
}

/// `prompt result`, cursor at the end.
pub fn summary(theme: &Theme, prompt: &str, result: &str) -> Frame {
    let mut lines = Vec::new();
    for (i, text) in result.split('\n').enumerate() {
        let mut line = Line::new();
        if i == 0 {
            line.push(prompt, &theme.palette.prompt);
            line.push(" ", "");
        }
        line.push(text, &theme.palette.result);
        lines.push(line);
    }
    let last = lines.len() - 1;
    let column = lines[last].width();
    Frame::new(lines, Cursor::new(last, column))
}
