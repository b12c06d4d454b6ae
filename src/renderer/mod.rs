//! Inline differential renderer.
//!
//! - [`frame`]: the immutable [`Frame`] value widgets produce
//! - [`layout`]: wrap arithmetic from logical lines to physical rows
//! - [`diff`]: [`diff_frames`] and the stateful [`DiffRenderer`]
//! - [`ansi`]: the control sequences written
//! - [`output`]: batching into one write per frame

pub mod ansi;
pub mod diff;
pub mod frame;
pub mod layout;
pub mod output;

pub use diff::{diff_frames, DiffRenderer};
pub use frame::{Cell, Cursor, Frame, Line, Segment};
pub use layout::{FrameLayout, LineLayout};
pub use output::OutputBuffer;
