//! Key events as widgets see them.
//!
//! Backends decode platform input into [`RawKey`]s (key code plus
//! modifiers); [`KeyEvent::from_raw`] folds those onto the closed set of
//! actions the prompt widgets understand. Keys with no prompt meaning map to
//! `None` and are dropped by the session.

pub mod parser;

pub use parser::{InputParser, KeyCode, Modifier, RawKey};

/// One unit of input delivered by a [`Session`](crate::session::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// A printable rune.
    Char(char),
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    BackTab,
    Enter,
    Backspace,
    Delete,
    Escape,
    /// Ctrl+C.
    Interrupt,
    /// Ctrl+D.
    EndOfInput,
    /// The terminal changed size; delivered in order with key presses.
    Resize { width: u16, height: u16 },
}

impl KeyEvent {
    /// Map a decoded key onto a prompt action.
    pub fn from_raw(raw: RawKey) -> Option<KeyEvent> {
        let ctrl = raw.modifiers.contains(Modifier::CTRL);
        let alt = raw.modifiers.contains(Modifier::ALT);

        let event = match raw.code {
            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'c' => KeyEvent::Interrupt,
                'd' => KeyEvent::EndOfInput,
                'a' => KeyEvent::Home,
                'e' => KeyEvent::End,
                'b' => KeyEvent::Left,
                'f' => KeyEvent::Right,
                'p' => KeyEvent::Up,
                'n' => KeyEvent::Down,
                'h' => KeyEvent::Backspace,
                _ => return None,
            },
            KeyCode::Char(c) if alt => match c {
                'b' => KeyEvent::WordLeft,
                'f' => KeyEvent::WordRight,
                _ => return None,
            },
            KeyCode::Char(c) => KeyEvent::Char(c),
            KeyCode::Left if ctrl || alt => KeyEvent::WordLeft,
            KeyCode::Right if ctrl || alt => KeyEvent::WordRight,
            KeyCode::Left => KeyEvent::Left,
            KeyCode::Right => KeyEvent::Right,
            KeyCode::Up => KeyEvent::Up,
            KeyCode::Down => KeyEvent::Down,
            KeyCode::Home => KeyEvent::Home,
            KeyCode::End => KeyEvent::End,
            KeyCode::PageUp => KeyEvent::PageUp,
            KeyCode::PageDown => KeyEvent::PageDown,
            KeyCode::Tab if raw.modifiers.contains(Modifier::SHIFT) => KeyEvent::BackTab,
            KeyCode::Tab => KeyEvent::Tab,
            KeyCode::Enter => KeyEvent::Enter,
            KeyCode::Backspace => KeyEvent::Backspace,
            KeyCode::Delete => KeyEvent::Delete,
            KeyCode::Escape => KeyEvent::Escape,
            KeyCode::Insert | KeyCode::Null => return None,
        };
        Some(event)
    }

    /// Decode a string into the events typing it would produce.
    ///
    /// `\n` becomes Enter and `\t` becomes Tab; other controls are skipped.
    pub fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars()
            .filter_map(|c| match c {
                '\n' | '\r' => Some(KeyEvent::Enter),
                '\t' => Some(KeyEvent::Tab),
                c if crate::text::is_control(c) => None,
                c => Some(KeyEvent::Char(c)),
            })
            .collect()
    }
}
