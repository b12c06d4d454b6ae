//! Event dispatch.
//!
//! Widgets report every state change to an optional caller callback. The
//! callback runs synchronously on the widget's own loop, right after the
//! mutation and before the next frame is built, so whatever it writes into
//! the [`Info`] slot shows up in that same frame.

use std::fmt;

/// Something a widget did. Closed set; each tag carries its own payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Text was inserted. `len` is the buffer length afterwards, in characters.
    Insert { text: String, len: usize },
    /// Characters were removed. `len` is the buffer length afterwards.
    Delete { len: usize },
    /// The cursor moved horizontally.
    MoveX { left: bool },
    /// The cursor moved vertically.
    MoveY { up: bool },
    /// The cursor jumped a word.
    JumpX { left: bool },
    /// Spaces were inserted in place of a tab.
    Indent { size: usize },
    /// The filter text changed.
    Filter { text: String },
    /// Focus moved to the option at this original index.
    Focus { index: usize },
    /// One option was picked or unpicked.
    Pick { index: usize, picked: bool },
    /// Every option in the filtered view was picked or unpicked.
    PickAll { picked: bool, count: usize },
    /// A traversal entered `name`; `depth` is the new trail length.
    Enter { name: String, depth: usize },
    /// A traversal went back up; `depth` is the new trail length.
    Back { depth: usize },
    /// A keystroke or submission was refused.
    Reject,
    /// The widget committed its value.
    Submit,
}

/// Caller-writable status slot shown in a widget's header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    text: Option<String>,
}

impl Info {
    /// Replace the widget's own info text.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Go back to the widget's own info text.
    pub fn clear(&mut self) {
        self.text = None;
    }

    pub fn get(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Callback type.
pub type Callback<'a> = Box<dyn FnMut(&Event, &mut Info) + 'a>;

/// Holds the callback and the info slot it may write.
#[derive(Default)]
pub struct Dispatcher<'a> {
    callback: Option<Callback<'a>>,
    info: Info,
}

impl<'a> Dispatcher<'a> {
    /// A dispatcher with no callback.
    pub fn silent() -> Self {
        Self { callback: None, info: Info::default() }
    }

    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&Event, &mut Info) + 'a,
    {
        Self { callback: Some(Box::new(callback)), info: Info::default() }
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&Event, &mut Info) + 'a,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Invoke the callback, if any.
    pub fn emit(&mut self, event: Event) {
        if let Some(callback) = self.callback.as_mut() {
            callback(&event, &mut self.info);
        }
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }
}

impl fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("callback", &self.callback.is_some())
            .field("info", &self.info)
            .finish()
    }
}
