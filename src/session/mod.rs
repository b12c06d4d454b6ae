//! Terminal session.
//!
//! A [`Session`] holds the terminal exclusively while one prompt runs. It
//! puts the device into character-at-a-time mode on open and restores the
//! saved mode on [`Session::close`] or drop, whichever comes first, so the
//! terminal is restored on every exit path: normal completion, cancellation,
//! an error returned by a collaborator, or a panic unwinding through the
//! widget loop.
//!
//! Platform differences live behind the [`Backend`] trait:
//! - [`termios::TermiosTerminal`] (unix): libc termios, `poll(2)` reads,
//!   SIGWINCH for resizes
//! - [`console::ConsoleTerminal`]: crossterm raw mode and event reader
//!   (the only choice on Windows)
//! - [`scripted::ScriptedTerminal`]: replays a key script and records
//!   output, for tests and headless use

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::input::KeyEvent;

pub mod console;
pub mod scripted;
#[cfg(unix)]
pub mod termios;

/// Bell. Written on every rejected keystroke.
const BELL: &[u8] = b"\x07";

/// Set while some session holds the process's controlling terminal.
static TERMINAL_HELD: AtomicBool = AtomicBool::new(false);

/// The shared device flag for backends that drive the real terminal.
pub(crate) fn terminal_device() -> &'static AtomicBool {
    &TERMINAL_HELD
}

// =============================================================================
// Backend
// =============================================================================

/// One platform family of terminal control.
pub trait Backend {
    /// Flag marking the underlying device as held. Backends sharing a
    /// device must return the same flag.
    fn device(&self) -> &AtomicBool;

    /// Save the current mode and switch to raw input without echo.
    fn enter_raw(&mut self) -> Result<()>;

    /// Restore the mode saved by [`enter_raw`](Backend::enter_raw).
    fn leave_raw(&mut self) -> Result<()>;

    /// Block until the next key press or resize.
    fn read_event(&mut self) -> Result<KeyEvent>;

    /// Write bytes to the terminal and flush.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()>;

    /// Current width in columns.
    fn width(&self) -> u16;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn device(&self) -> &AtomicBool {
        (**self).device()
    }

    fn enter_raw(&mut self) -> Result<()> {
        (**self).enter_raw()
    }

    fn leave_raw(&mut self) -> Result<()> {
        (**self).leave_raw()
    }

    fn read_event(&mut self) -> Result<KeyEvent> {
        (**self).read_event()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_all(bytes)
    }

    fn width(&self) -> u16 {
        (**self).width()
    }
}

/// Which backend to use for the real terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// termios on unix, console elsewhere.
    #[default]
    Auto,
    /// libc termios (unix only).
    Termios,
    /// crossterm console API.
    Console,
}

/// Open a session on the process's terminal.
pub fn open_terminal(kind: BackendKind, escape_timeout: Duration) -> Result<Session<Box<dyn Backend>>> {
    let backend: Box<dyn Backend> = match kind {
        #[cfg(unix)]
        BackendKind::Auto | BackendKind::Termios => {
            Box::new(termios::TermiosTerminal::new(escape_timeout)?)
        }
        #[cfg(not(unix))]
        BackendKind::Auto | BackendKind::Termios => {
            if kind == BackendKind::Termios {
                warn!("termios backend unavailable on this platform, using console");
            }
            let _ = escape_timeout;
            Box::new(console::ConsoleTerminal::new()?)
        }
        BackendKind::Console => Box::new(console::ConsoleTerminal::new()?),
    };
    debug!(?kind, "terminal backend selected");
    Session::open(backend)
}

// =============================================================================
// Session
// =============================================================================

/// Exclusive, scoped hold on a terminal in raw mode.
pub struct Session<B: Backend> {
    backend: B,
    open: bool,
}

impl<B: Backend> Session<B> {
    /// Claim the device and enter raw mode.
    ///
    /// Fails with [`Error::SessionBusy`] if another session holds the same
    /// device. If raw mode cannot be entered the device is released again
    /// and the error returned.
    pub fn open(mut backend: B) -> Result<Self> {
        if backend.device().swap(true, Ordering::AcqRel) {
            return Err(Error::SessionBusy);
        }
        if let Err(err) = backend.enter_raw() {
            backend.device().store(false, Ordering::Release);
            return Err(err);
        }
        debug!(width = backend.width(), "session opened");
        Ok(Self { backend, open: true })
    }

    /// Whether raw mode is still in effect.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Block for the next key press or resize notification.
    pub fn next_event(&mut self) -> Result<KeyEvent> {
        if !self.open {
            return Err(Error::InputClosed);
        }
        self.backend.read_event()
    }

    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.backend.write_all(bytes)
    }

    /// Ring the terminal bell.
    pub fn ring(&mut self) -> Result<()> {
        self.backend.write_all(BELL)
    }

    pub fn width(&self) -> u16 {
        self.backend.width().max(1)
    }

    /// Restore the saved terminal mode and release the device.
    ///
    /// Idempotent: only the first call touches the terminal.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        let restored = self.backend.leave_raw();
        self.backend.device().store(false, Ordering::Release);
        debug!("session closed");
        restored
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to restore terminal mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedTerminal;
    use super::*;

    #[test]
    fn open_enters_raw_mode_once() {
        let term = ScriptedTerminal::new(80);
        let session = Session::open(term.clone()).unwrap();
        assert!(session.is_open());
        assert_eq!(term.enter_count(), 1);
        assert!(term.is_raw());
    }

    #[test]
    fn close_is_idempotent() {
        let term = ScriptedTerminal::new(80);
        let mut session = Session::open(term.clone()).unwrap();
        session.close().unwrap();
        session.close().unwrap();
        drop(session);
        assert_eq!(term.restore_count(), 1);
        assert!(!term.is_raw());
    }

    #[test]
    fn drop_restores() {
        let term = ScriptedTerminal::new(80);
        {
            let _session = Session::open(term.clone()).unwrap();
        }
        assert_eq!(term.restore_count(), 1);
    }

    #[test]
    fn second_open_fails_fast() {
        let term = ScriptedTerminal::new(80);
        let _held = Session::open(term.clone()).unwrap();
        assert!(matches!(Session::open(term.clone()), Err(Error::SessionBusy)));
        assert_eq!(term.enter_count(), 1);
    }

    #[test]
    fn reopen_after_close() {
        let term = ScriptedTerminal::new(80);
        let mut first = Session::open(term.clone()).unwrap();
        first.close().unwrap();
        let _second = Session::open(term.clone()).unwrap();
        assert_eq!(term.enter_count(), 2);
    }

    #[test]
    fn failed_raw_mode_releases_device() {
        let term = ScriptedTerminal::new(80);
        term.fail_next_enter();
        assert!(Session::open(term.clone()).is_err());
        assert_eq!(term.restore_count(), 0);
        assert!(Session::open(term.clone()).is_ok());
    }

    #[test]
    fn closed_session_yields_no_events() {
        let term = ScriptedTerminal::new(80);
        term.push(KeyEvent::Enter);
        let mut session = Session::open(term).unwrap();
        session.close().unwrap();
        assert!(matches!(session.next_event(), Err(Error::InputClosed)));
    }

    #[test]
    fn ring_writes_bell() {
        let term = ScriptedTerminal::new(80);
        let mut session = Session::open(term.clone()).unwrap();
        session.ring().unwrap();
        assert_eq!(term.output(), b"\x07");
    }
}
