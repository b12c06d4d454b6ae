//! Interactive widgets and the loop that drives them.
//!
//! A widget is a state machine over [`KeyEvent`]s. The loop in [`drive`]
//! asks it for a [`Frame`], hands the frame to the [`DiffRenderer`], writes
//! the delta, then blocks for the next key. Widgets never touch the terminal
//! themselves: they only describe what should be on screen.
//!
//! - [`Input`]: single- or multi-line text field
//! - [`Select`]: filterable single/multi pick list
//! - [`Traverse`]: walks a [`Namespace`] one level at a time

use tracing::{debug, trace};

use crate::error::Result;
use crate::input::KeyEvent;
use crate::renderer::{DiffRenderer, Frame};
use crate::session::{Backend, Session};
use crate::theme::Theme;

pub mod input;
pub mod namespace;
pub mod options;
pub mod select;
pub mod stage;
pub mod traverse;

pub use input::Input;
pub use namespace::{Entry, EntryKind, FsNamespace, Namespace, NamespaceError};
pub use options::OptionSet;
pub use select::{Select, SelectState};
pub use traverse::Traverse;

/// What a widget wants after handling one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<T> {
    /// Keep going.
    Continue,
    /// The key was refused. State is unchanged; the terminal bell rings.
    Reject,
    /// Commit this value.
    Done(T),
    /// The user gave up.
    Cancel,
}

/// How a widget run ended. Cancellation is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Committed(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The committed value, if any.
    pub fn committed(self) -> Option<T> {
        match self {
            Self::Committed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

pub trait Widget {
    type Output;

    /// Runs once before the first frame. An error here aborts the run
    /// before anything is painted.
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Apply one key. Resize events never reach the widget.
    fn handle(&mut self, key: KeyEvent) -> Result<Flow<Self::Output>>;

    /// The frame for the current state.
    fn frame(&self, theme: &Theme, width: usize) -> Frame;

    /// What stays on screen after the value is committed.
    fn summary(&self, theme: &Theme, width: usize) -> Frame;
}

/// Run `widget` to completion on an open session.
///
/// On error the painted region is wiped before the error is returned; the
/// session itself is left for the caller to close.
pub fn drive<B: Backend, W: Widget + ?Sized>(
    session: &mut Session<B>,
    widget: &mut W,
    theme: &Theme,
) -> Result<Outcome<W::Output>> {
    widget.start()?;
    let mut renderer = DiffRenderer::new();
    let result = event_loop(session, widget, theme, &mut renderer);
    if result.is_err() && renderer.has_previous() {
        let width = session.width();
        if let Ok(bytes) = renderer.clear(width) {
            // Already failing; the original error is the one to report.
            let _ = session.write(bytes);
        }
    }
    result
}

fn event_loop<B: Backend, W: Widget + ?Sized>(
    session: &mut Session<B>,
    widget: &mut W,
    theme: &Theme,
    renderer: &mut DiffRenderer,
) -> Result<Outcome<W::Output>> {
    loop {
        let width = session.width();
        let frame = widget.frame(theme, usize::from(width));
        let bytes = renderer.render(&frame, width)?;
        session.write(bytes)?;

        let key = session.next_event()?;
        if let KeyEvent::Resize { width, .. } = key {
            debug!(width, "terminal resized");
            let bytes = renderer.resize(width)?;
            session.write(bytes)?;
            continue;
        }

        match widget.handle(key)? {
            Flow::Continue => {}
            Flow::Reject => {
                trace!(?key, "key rejected");
                session.ring()?;
            }
            Flow::Done(value) => {
                let width = session.width();
                let summary = widget.summary(theme, usize::from(width));
                let bytes = renderer.finish(&summary, width)?;
                session.write(bytes)?;
                debug!("widget committed");
                return Ok(Outcome::Committed(value));
            }
            Flow::Cancel => {
                let bytes = renderer.clear(session.width())?;
                session.write(bytes)?;
                debug!("widget cancelled");
                return Ok(Outcome::Cancelled);
            }
        }
    }
}
