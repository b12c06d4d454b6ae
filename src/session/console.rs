//! Console backend on crossterm.
//!
//! Used on Windows, where crossterm drives the console API (raw mode,
//! virtual-terminal input). It works on unix terminals too and can be
//! chosen there explicitly.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::AtomicBool;

use crossterm::event::{self, Event, KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::input::{KeyCode, KeyEvent, Modifier, RawKey};

use super::{terminal_device, Backend};

const DEFAULT_WIDTH: u16 = 80;

/// crossterm-backed terminal. Frames are drawn on stderr.
pub struct ConsoleTerminal {
    raw: bool,
}

impl ConsoleTerminal {
    /// Fails with [`Error::NotATerminal`] unless stdin and stderr are terminals.
    pub fn new() -> Result<Self> {
        if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
            return Err(Error::NotATerminal);
        }
        Ok(Self { raw: false })
    }
}

impl Backend for ConsoleTerminal {
    fn device(&self) -> &AtomicBool {
        terminal_device()
    }

    fn enter_raw(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.raw = true;
        debug!("console raw mode entered");
        Ok(())
    }

    fn leave_raw(&mut self) -> Result<()> {
        if self.raw {
            self.raw = false;
            terminal::disable_raw_mode()?;
            debug!("console mode restored");
        }
        Ok(())
    }

    fn read_event(&mut self) -> Result<KeyEvent> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(event) = translate(key).and_then(KeyEvent::from_raw) {
                        return Ok(event);
                    }
                }
                Event::Resize(width, height) => return Ok(KeyEvent::Resize { width, height }),
                _ => {}
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(bytes)?;
        err.flush()?;
        Ok(())
    }

    fn width(&self) -> u16 {
        terminal::size().map(|(w, _)| w).unwrap_or(DEFAULT_WIDTH)
    }
}

/// Convert a crossterm key into the decoder's representation.
fn translate(key: CtKeyEvent) -> Option<RawKey> {
    let mut modifiers = Modifier::NONE;
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifier::SHIFT;
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        modifiers |= Modifier::ALT;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifier::CTRL;
    }

    let code = match key.code {
        CtKeyCode::Char(c) => KeyCode::Char(c),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::BackTab => return Some(RawKey::new(KeyCode::Tab, modifiers | Modifier::SHIFT)),
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Esc => KeyCode::Escape,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(RawKey::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(code: CtKeyCode, modifiers: KeyModifiers) -> Option<KeyEvent> {
        translate(CtKeyEvent::new(code, modifiers)).and_then(KeyEvent::from_raw)
    }

    #[test]
    fn translates_ctrl_c_to_interrupt() {
        assert_eq!(ct(CtKeyCode::Char('c'), KeyModifiers::CONTROL), Some(KeyEvent::Interrupt));
    }

    #[test]
    fn translates_back_tab() {
        assert_eq!(ct(CtKeyCode::BackTab, KeyModifiers::SHIFT), Some(KeyEvent::BackTab));
    }

    #[test]
    fn translates_word_jumps() {
        assert_eq!(ct(CtKeyCode::Left, KeyModifiers::CONTROL), Some(KeyEvent::WordLeft));
        assert_eq!(ct(CtKeyCode::Char('f'), KeyModifiers::ALT), Some(KeyEvent::WordRight));
    }

    #[test]
    fn ignores_function_keys() {
        assert_eq!(ct(CtKeyCode::F(5), KeyModifiers::NONE), None);
    }
}
