//! Escape sequence handling for text that ends up inside a frame.
//!
//! Two operations live here:
//! - [`strip_ansi`] removes escape sequences from *trusted* styled text so
//!   it can be measured.
//! - [`sanitize`] / [`Sanitizer`] neutralize *untrusted* text (typed or
//!   pasted by the user, option labels from the caller) before it is echoed
//!   inside a frame.
//!
//! Recognized sequences:
//! - CSI: `ESC [` parameters (0x30-0x3F), intermediates (0x20-0x2F), final (0x40-0x7E)
//! - OSC/DCS/SOS/PM/APC: `ESC ]`/`ESC P`/`ESC X`/`ESC ^`/`ESC _` ... BEL or ST (`ESC \`)
//! - nF escapes: `ESC` intermediates (0x20-0x2F) final (0x30-0x7E)
//! - Two-character escapes: `ESC` + 0x30-0x7E
//!
//! The sanitizer removes complete sequences. An introducer that is never
//! properly terminated loses only its ESC byte; whatever followed it is
//! re-scanned as ordinary text. Every remaining C0, DEL and C1 control is
//! dropped, so sanitized output never contains ESC and sanitizing twice is
//! the same as sanitizing once.

use std::borrow::Cow;

use super::width::visible_width;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// Longest sequence buffered before the sanitizer gives up on it.
const MAX_SEQUENCE: usize = 4096;

// =============================================================================
// Stripping (trusted text)
// =============================================================================

/// Strip ANSI escape sequences from a string.
///
/// Returns `Cow::Borrowed` when no escape sequences are present (zero allocation).
/// Returns `Cow::Owned` with sequences removed otherwise.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&0x1B) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        if bytes[i] == 0x1B {
            i = skip_escape_sequence(bytes, i);
        } else {
            // ESC is ASCII, so slicing at ESC positions keeps UTF-8 intact.
            let start = i;
            while i < len && bytes[i] != 0x1B {
                i += 1;
            }
            result.push_str(&s[start..i]);
        }
    }

    Cow::Owned(result)
}

/// Skip an escape sequence starting at `pos` (which points to ESC byte).
/// Returns the byte index after the sequence.
fn skip_escape_sequence(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }

    match bytes[next] {
        b'[' => skip_csi(bytes, next + 1),
        b']' | b'P' | b'X' | b'^' | b'_' => skip_string_terminated(bytes, next + 1),
        0x20..=0x7E => next + 1,
        // ESC followed by a control or a non-ASCII byte: drop the ESC alone.
        _ => next,
    }
}

/// Skip a CSI sequence. `pos` is the byte after `[`.
fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1;
        }
        if !(0x20..=0x3F).contains(&b) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

/// Skip a string-terminated sequence. `pos` is the byte after the type indicator.
fn skip_string_terminated(bytes: &[u8], pos: usize) -> usize {
    let len = bytes.len();
    let mut i = pos;
    while i < len {
        match bytes[i] {
            0x07 => return i + 1,
            0x1B if i + 1 < len && bytes[i + 1] == b'\\' => return i + 2,
            _ => i += 1,
        }
    }
    len
}

// =============================================================================
// Sanitizing (untrusted text)
// =============================================================================

/// Whether a character is a C0 control, DEL or a C1 control.
#[inline]
pub fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F)
}

/// Neutralize control sequences in untrusted text.
///
/// Borrows the input when it contains no control characters at all.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_control) {
        return Cow::Borrowed(text);
    }
    let mut sanitizer = Sanitizer::new();
    let mut out = String::with_capacity(text.len());
    sanitizer.feed(text, &mut out);
    sanitizer.finish(&mut out);
    Cow::Owned(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    /// Seen ESC.
    Escape,
    /// Seen ESC followed by intermediates.
    EscapeIntermediate,
    /// Inside `ESC [`; `true` once an intermediate byte was seen.
    Csi { intermediate: bool },
    /// Inside a string sequence, waiting for BEL or ST.
    Str,
    /// Inside a string sequence, just seen ESC.
    StrEscape,
}

/// Receives sanitized characters with the index (in characters, counted
/// from the first fed character) of the source character each came from.
trait Emit {
    fn emit(&mut self, c: char, source: usize);
}

impl Emit for String {
    fn emit(&mut self, c: char, _source: usize) {
        self.push(c);
    }
}

/// Keeps only output produced by source characters before `limit`.
struct Before {
    limit: usize,
    text: String,
}

impl Emit for Before {
    fn emit(&mut self, c: char, source: usize) {
        if source < self.limit {
            self.text.push(c);
        }
    }
}

/// Streaming sanitizer.
///
/// Text may arrive in arbitrary chunks; a sequence split across two
/// [`feed`](Sanitizer::feed) calls is recognized exactly as if it had
/// arrived whole. Call [`finish`](Sanitizer::finish) at end of input to
/// release anything still held back.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    state: State,
    pending: String,
    /// Source index of the ESC opening `pending`.
    pending_start: usize,
    /// Characters fed so far.
    fed: usize,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self { state: State::Ground, pending: String::new(), pending_start: 0, fed: 0 }
    }

    /// Whether a partial sequence is currently held back.
    pub fn has_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Sanitize one chunk, appending safe text to `out`.
    pub fn feed(&mut self, chunk: &str, out: &mut String) {
        self.feed_into(chunk, out);
    }

    /// Flush at end of input. Unterminated sequences degrade to literal text.
    pub fn finish(&mut self, out: &mut String) {
        self.finish_into(out);
    }

    fn feed_into<E: Emit>(&mut self, chunk: &str, out: &mut E) {
        for c in chunk.chars() {
            let at = self.fed;
            self.fed += 1;
            self.step(c, at, out);
        }
    }

    fn finish_into<E: Emit>(&mut self, out: &mut E) {
        while self.state != State::Ground {
            self.abort(out);
        }
    }

    fn step<E: Emit>(&mut self, c: char, at: usize, out: &mut E) {
        match self.state {
            State::Ground => {
                if c == ESC {
                    self.pending.clear();
                    self.pending.push(ESC);
                    self.pending_start = at;
                    self.state = State::Escape;
                } else if !is_control(c) {
                    out.emit(c, at);
                }
            }
            State::Escape => match c {
                '[' => self.advance(c, State::Csi { intermediate: false }, out),
                ']' | 'P' | 'X' | '^' | '_' => self.advance(c, State::Str, out),
                '\x20'..='\x2F' => self.advance(c, State::EscapeIntermediate, out),
                '\x30'..='\x7E' => self.complete(),
                _ => self.reject(c, at, out),
            },
            State::EscapeIntermediate => match c {
                '\x20'..='\x2F' => self.advance(c, State::EscapeIntermediate, out),
                '\x30'..='\x7E' => self.complete(),
                _ => self.reject(c, at, out),
            },
            State::Csi { intermediate } => match c {
                '\x30'..='\x3F' if !intermediate => self.advance(c, State::Csi { intermediate }, out),
                '\x20'..='\x2F' => self.advance(c, State::Csi { intermediate: true }, out),
                '\x40'..='\x7E' => self.complete(),
                _ => self.reject(c, at, out),
            },
            State::Str => match c {
                BEL => self.complete(),
                ESC => self.advance(c, State::StrEscape, out),
                c if is_control(c) => self.reject(c, at, out),
                _ => self.advance(c, State::Str, out),
            },
            State::StrEscape => match c {
                '\\' => self.complete(),
                _ => self.reject(c, at, out),
            },
        }
    }

    fn advance<E: Emit>(&mut self, c: char, state: State, out: &mut E) {
        self.pending.push(c);
        self.state = state;
        if self.pending.len() > MAX_SEQUENCE {
            self.abort(out);
        }
    }

    fn complete(&mut self) {
        self.pending.clear();
        self.state = State::Ground;
    }

    /// `c` cannot continue the current sequence.
    fn reject<E: Emit>(&mut self, c: char, at: usize, out: &mut E) {
        self.abort(out);
        self.step(c, at, out);
    }

    /// Drop the introducing ESC and re-scan what followed it.
    fn abort<E: Emit>(&mut self, out: &mut E) {
        let pending = std::mem::take(&mut self.pending);
        let start = self.pending_start;
        self.state = State::Ground;
        for (offset, c) in pending.chars().enumerate().skip(1) {
            self.step(c, start + offset, out);
        }
    }
}

/// Visible width, within `sanitize(text)`, of what the first `chars`
/// characters of `text` turned into.
///
/// Characters of a sequence that is removed as a whole contribute nothing,
/// even when the sequence is only completed after `chars`.
pub fn sanitized_width_before(text: &str, chars: usize) -> usize {
    let mut sanitizer = Sanitizer::new();
    let mut out = Before { limit: chars, text: String::new() };
    sanitizer.feed_into(text, &mut out);
    sanitizer.finish_into(&mut out);
    visible_width(&out.text)
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
