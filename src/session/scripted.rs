//! Scripted terminal for tests and headless runs.
//!
//! A [`ScriptedTerminal`] is a cheap, cloneable handle: hand one clone to
//! [`Session::open`](super::Session::open) and keep another to queue keys
//! and inspect what the prompt wrote. It counts raw-mode entries and
//! restorations so tests can check the session restored the terminal
//! exactly once.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::input::KeyEvent;

use super::Backend;

#[derive(Debug, Default)]
struct Script {
    events: VecDeque<KeyEvent>,
    output: Vec<u8>,
    width: u16,
    raw: bool,
    entered: usize,
    restored: usize,
    fail_enter: bool,
}

/// In-memory terminal replaying a queue of key events.
///
/// Once the queue runs dry, reads fail with [`Error::InputClosed`].
#[derive(Debug, Clone)]
pub struct ScriptedTerminal {
    script: Arc<Mutex<Script>>,
    held: Arc<AtomicBool>,
}

impl ScriptedTerminal {
    pub fn new(width: u16) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script { width, ..Script::default() })),
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue one event.
    pub fn push(&self, event: KeyEvent) {
        self.lock().events.push_back(event);
    }

    /// Queue several events.
    pub fn push_all<I: IntoIterator<Item = KeyEvent>>(&self, events: I) {
        self.lock().events.extend(events);
    }

    /// Queue the events typing `text` produces.
    pub fn type_text(&self, text: &str) {
        self.push_all(KeyEvent::typed(text));
    }

    /// Everything written so far.
    pub fn output(&self) -> Vec<u8> {
        self.lock().output.clone()
    }

    /// Everything written so far, lossily decoded.
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.lock().output).into_owned()
    }

    /// Drain the recorded output.
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.lock().output)
    }

    pub fn enter_count(&self) -> usize {
        self.lock().entered
    }

    pub fn restore_count(&self) -> usize {
        self.lock().restored
    }

    pub fn is_raw(&self) -> bool {
        self.lock().raw
    }

    /// Events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().events.len()
    }

    /// Make the next `enter_raw` fail, as a terminal that rejects mode
    /// changes would.
    pub fn fail_next_enter(&self) {
        self.lock().fail_enter = true;
    }
}

impl Backend for ScriptedTerminal {
    fn device(&self) -> &AtomicBool {
        &self.held
    }

    fn enter_raw(&mut self) -> Result<()> {
        let mut script = self.lock();
        if std::mem::take(&mut script.fail_enter) {
            return Err(Error::NotATerminal);
        }
        script.raw = true;
        script.entered += 1;
        Ok(())
    }

    fn leave_raw(&mut self) -> Result<()> {
        let mut script = self.lock();
        script.raw = false;
        script.restored += 1;
        Ok(())
    }

    fn read_event(&mut self) -> Result<KeyEvent> {
        let mut script = self.lock();
        let event = script.events.pop_front().ok_or(Error::InputClosed)?;
        if let KeyEvent::Resize { width, .. } = event {
            script.width = width;
        }
        Ok(event)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.lock().output.extend_from_slice(bytes);
        Ok(())
    }

    fn width(&self) -> u16 {
        self.lock().width
    }
}
