//! Incremental rendering matches a fresh paint on an emulated terminal.
//!
//! Frames are fed through [`DiffRenderer`] into a `vt100` screen, one pass
//! after another. Whatever the sequence, the final screen (visible glyphs
//! and cursor) must equal what a brand new renderer paints for the last
//! frame alone.

use proptest::prelude::*;

use spark_prompt::{Cursor, DiffRenderer, Frame, Line};

// =============================================================================
// HELPERS
// =============================================================================

/// Tall enough that no test frame ever scrolls.
const SCREEN_ROWS: u16 = 48;

/// What a person looking at the terminal would see.
#[derive(Debug, PartialEq, Eq)]
struct Screen {
    rows: Vec<String>,
    cursor: (u16, u16),
}

fn paint(frames: &[Frame], width: u16) -> Screen {
    let mut parser = vt100::Parser::new(SCREEN_ROWS, width, 0);
    let mut renderer = DiffRenderer::new();
    for frame in frames {
        let bytes = renderer.render(frame, width).unwrap();
        parser.process(bytes);
    }
    snapshot(parser.screen(), width)
}

/// Erased cells and written spaces look the same, so both read as `' '`.
fn snapshot(screen: &vt100::Screen, width: u16) -> Screen {
    let rows = (0..SCREEN_ROWS)
        .map(|row| {
            let text: String = (0..width)
                .map(|col| match screen.cell(row, col).map(|cell| cell.contents()) {
                    Some(glyph) if !glyph.is_empty() => glyph,
                    _ => " ".to_string(),
                })
                .collect();
            text.trim_end().to_string()
        })
        .collect();
    Screen { rows, cursor: screen.cursor_position() }
}

fn assert_converges(frames: &[Frame], width: u16) {
    let last = std::slice::from_ref(frames.last().unwrap());
    assert_eq!(paint(frames, width), paint(last, width));
}

fn frame(lines: &[&str], cursor: Cursor) -> Frame {
    Frame::new(lines.iter().map(|l| Line::plain(l)).collect(), cursor)
}

// =============================================================================
// WIDE CHARACTERS
// =============================================================================

#[test]
fn early_wrap_gap_is_cleared() {
    // At width 6 the second 界 no longer fits on row 0 and leaves column 5
    // empty; the old "b" drawn there must not survive.
    let frames = [
        frame(&["é界界b"], Cursor::new(0, 0)),
        frame(&["abb界界aéb"], Cursor::new(0, 0)),
    ];
    assert_converges(&frames, 6);

    let screen = paint(&frames, 6);
    assert_eq!(screen.rows[0], "abb界");
    assert_eq!(screen.rows[1], "界 aéb");
}

#[test]
fn edit_after_gap_keeps_gap_blank() {
    let frames = [
        frame(&["abcde界x"], Cursor::new(0, 7)),
        frame(&["abcde界y"], Cursor::new(0, 7)),
    ];
    assert_converges(&frames, 6);
    assert_eq!(paint(&frames, 6).rows[0], "abcde");
}

#[test]
fn gap_opened_by_edit_further_left() {
    // Inserting one column pushes the wide char onto the next row.
    let frames = [
        frame(&["abcd界zzzz"], Cursor::new(0, 0)),
        frame(&["abcde界zzz"], Cursor::new(0, 0)),
    ];
    assert_converges(&frames, 6);
}

#[test]
fn margin_line_then_shorter_line() {
    let frames = [
        frame(&["abcdef", "x"], Cursor::new(1, 1)),
        frame(&["abcde", "x"], Cursor::new(0, 5)),
    ];
    assert_converges(&frames, 6);
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn line(width: u16) -> impl Strategy<Value = Line> {
    let width = usize::from(width);
    prop_oneof![
        "[ab é界]{0,12}".prop_map(|text| Line::plain(&text)),
        // Narrow text ending exactly at the right margin.
        ("[ab]{0,3}", 1usize..3).prop_map(move |(head, rows)| {
            let fill = "x".repeat(width * rows - head.len());
            Line::plain(&format!("{head}{fill}"))
        }),
        // Wide runs: end at the margin on even widths, leave gaps on odd ones.
        ("[ab]{0,2}", 1usize..3).prop_map(move |(head, rows)| {
            Line::plain(&format!("{head}{}", "界".repeat(width * rows / 2)))
        }),
        ("[ab ]{0,4}", "[é界]{1,4}").prop_map(|(plain, bold)| Line::new().with(&plain, "").with(&bold, "\x1b[1m")),
    ]
}

fn frame_at(width: u16) -> impl Strategy<Value = Frame> {
    (prop::collection::vec(line(width), 1..5), 0usize..5, 0usize..16)
        .prop_map(|(lines, row, column)| Frame::new(lines, Cursor::new(row, column)))
}

fn frame_sequence() -> impl Strategy<Value = (u16, Vec<Frame>)> {
    (4u16..10).prop_flat_map(|width| (Just(width), prop::collection::vec(frame_at(width), 1..5)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn incremental_paint_matches_fresh_paint((width, frames) in frame_sequence()) {
        let last = std::slice::from_ref(frames.last().unwrap());
        prop_assert_eq!(paint(&frames, width), paint(last, width));
    }

    #[test]
    fn every_intermediate_screen_matches((width, frames) in frame_sequence()) {
        for end in 1..=frames.len() {
            let last = std::slice::from_ref(&frames[end - 1]);
            prop_assert_eq!(paint(&frames[..end], width), paint(last, width));
        }
    }
}
