//! # spark-prompt
//!
//! Inline terminal prompts built directly on ANSI control sequences.
//!
//! ## Architecture
//!
//! One widget runs at a time over an exclusively held terminal session:
//! ```text
//! Session::next_event → Widget::handle → Widget::frame → DiffRenderer → Session::write
//! ```
//! Widgets are state machines that describe the screen as an immutable
//! [`Frame`]; the renderer diffs each frame against the last one it painted
//! and writes only the delta. Edits are reported synchronously through an
//! [`events::Dispatcher`] before the next frame is built.
//!
//! ## Modules
//!
//! - [`session`] - Raw-mode terminal sessions (termios, console, scripted)
//! - [`input`] - Key events and the byte-level key decoder
//! - [`text`] - Width measurement, sanitizing, truncation, styling
//! - [`renderer`] - Frames, wrap layout, differential rendering
//! - [`editor`] - The cursor-addressed text buffer
//! - [`events`] - Event dispatch to caller callbacks
//! - [`widgets`] - Input, Select, Traverse and the run loop
//! - [`theme`] - Palettes, symbols and presets
//! - [`config`] - TOML configuration

pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod input;
pub mod prompter;
pub mod renderer;
pub mod session;
pub mod text;
pub mod theme;
pub mod widgets;

// Re-export commonly used items
pub use config::PromptConfig;
pub use editor::{Direction, EditorBuffer, EditorLimits};
pub use error::{Error, Result};
pub use events::{Dispatcher, Event, Info};
pub use input::KeyEvent;
pub use prompter::{Prompter, ScopedTheme};
pub use renderer::{diff_frames, Cursor, DiffRenderer, Frame, Line, Segment};
pub use session::{open_terminal, Backend, BackendKind, Session};
pub use text::{paint, sanitize, strip_ansi, truncate_text, visible_width, Sanitizer};
pub use theme::{get_preset, Palette, Symbols, Theme};
pub use widgets::{
    Entry, EntryKind, Flow, FsNamespace, Input, Namespace, NamespaceError, OptionSet, Outcome, Select,
    SelectState, Traverse, Widget,
};
