//! Byte-level key decoder.
//!
//! Turns raw terminal input into [`RawKey`]s:
//! - CSI sequences (arrows, Home, End, Insert, Delete, PageUp/Down, Shift+Tab)
//! - SS3 sequences (application-mode arrows, Home, End)
//! - Alt+key (ESC + char)
//! - Control keys (bytes 0-31, DEL)
//! - UTF-8 multi-byte runes
//!
//! An ESC byte cannot be told apart from the start of a sequence until more
//! bytes arrive. The caller waits a short timeout while [`InputParser::has_pending`]
//! is true and then calls [`InputParser::flush_pending`].

// =============================================================================
// Types
// =============================================================================

/// A decoded key press, before it is mapped onto a prompt action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKey {
    pub code: KeyCode,
    pub modifiers: Modifier,
}

/// Key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Null,
}

bitflags::bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifier: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

impl RawKey {
    pub fn new(code: KeyCode, modifiers: Modifier) -> Self {
        Self { code, modifiers }
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Incremental decoder with a small lookahead buffer.
#[derive(Debug)]
pub struct InputParser {
    buf: Vec<u8>,
}

impl InputParser {
    pub fn new() -> Self {
        Self { buf: Vec::with_capacity(32) }
    }

    /// Decode as many keys as `data` (plus earlier leftovers) allows.
    /// Incomplete sequences stay buffered.
    pub fn parse(&mut self, data: &[u8]) -> Vec<RawKey> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();

        while !self.buf.is_empty() {
            match self.try_parse_one() {
                ParseResult::Key(key) => keys.push(key),
                ParseResult::Skip => {}
                ParseResult::Incomplete => break,
            }
        }

        keys
    }

    /// Whether bytes are buffered waiting for the rest of a sequence.
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve buffered bytes after the lookahead timeout expired.
    ///
    /// A leading ESC becomes a plain Escape key and the bytes after it are
    /// decoded on their own, so `ESC [` degrades to Escape followed by `[`.
    /// A truncated UTF-8 rune is discarded.
    pub fn flush_pending(&mut self) -> Vec<RawKey> {
        let mut keys = Vec::new();
        while !self.buf.is_empty() {
            match self.try_parse_one() {
                ParseResult::Key(key) => keys.push(key),
                ParseResult::Skip => {}
                ParseResult::Incomplete => {
                    let first = self.buf[0];
                    self.consume(1);
                    if first == 0x1B {
                        keys.push(RawKey::new(KeyCode::Escape, Modifier::NONE));
                    }
                }
            }
        }
        keys
    }

    fn try_parse_one(&mut self) -> ParseResult {
        let first = self.buf[0];

        match first {
            0x1B => self.parse_escape(),
            0x00 => self.single(KeyCode::Null, Modifier::CTRL),
            0x08 | 0x7F => self.single(KeyCode::Backspace, Modifier::NONE),
            0x09 => self.single(KeyCode::Tab, Modifier::NONE),
            0x0A | 0x0D => self.single(KeyCode::Enter, Modifier::NONE),
            0x01..=0x1A => self.single(KeyCode::Char((first + b'a' - 1) as char), Modifier::CTRL),
            0x1C..=0x1F => {
                self.consume(1);
                ParseResult::Skip
            }
            0x20..=0x7E => self.single(KeyCode::Char(first as char), Modifier::NONE),
            0x80..=0xFF => self.parse_utf8(),
        }
    }

    fn single(&mut self, code: KeyCode, modifiers: Modifier) -> ParseResult {
        self.consume(1);
        ParseResult::Key(RawKey::new(code, modifiers))
    }

    fn parse_escape(&mut self) -> ParseResult {
        if self.buf.len() < 2 {
            return ParseResult::Incomplete;
        }

        match self.buf[1] {
            b'[' => self.parse_csi(),
            b'O' => self.parse_ss3(),
            0x7F => {
                self.consume(2);
                ParseResult::Key(RawKey::new(KeyCode::Backspace, Modifier::ALT))
            }
            0x20..=0x7E => {
                let ch = self.buf[1] as char;
                self.consume(2);
                ParseResult::Key(RawKey::new(KeyCode::Char(ch), Modifier::ALT))
            }
            0x1B => {
                self.consume(2);
                ParseResult::Key(RawKey::new(KeyCode::Escape, Modifier::ALT))
            }
            _ => {
                self.consume(1);
                ParseResult::Key(RawKey::new(KeyCode::Escape, Modifier::NONE))
            }
        }
    }

    fn parse_csi(&mut self) -> ParseResult {
        // Find the final byte (0x40-0x7E); bail out on anything that cannot
        // belong to a CSI sequence.
        let mut end = 2;
        while end < self.buf.len() {
            let b = self.buf[end];
            if (0x40..=0x7E).contains(&b) {
                break;
            }
            if !(0x20..=0x3F).contains(&b) {
                // Malformed: drop `ESC [` and decode the rest as plain input.
                self.consume(2);
                return ParseResult::Skip;
            }
            end += 1;
        }

        if end >= self.buf.len() {
            return ParseResult::Incomplete;
        }

        let final_byte = self.buf[end];
        let params: Vec<u32> = String::from_utf8_lossy(&self.buf[2..end])
            .split(';')
            .map(|s| s.parse::<u32>().unwrap_or(0))
            .collect();
        self.consume(end + 1);

        let modifiers = match params.get(1) {
            Some(&p) if p > 0 => decode_modifier(p),
            _ => Modifier::NONE,
        };

        let code = match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            b'Z' => return ParseResult::Key(RawKey::new(KeyCode::Tab, Modifier::SHIFT)),
            b'~' => match params.first().copied().unwrap_or(0) {
                1 | 7 => KeyCode::Home,
                2 => KeyCode::Insert,
                3 => KeyCode::Delete,
                4 | 8 => KeyCode::End,
                5 => KeyCode::PageUp,
                6 => KeyCode::PageDown,
                _ => return ParseResult::Skip,
            },
            _ => return ParseResult::Skip,
        };

        ParseResult::Key(RawKey::new(code, modifiers))
    }

    fn parse_ss3(&mut self) -> ParseResult {
        if self.buf.len() < 3 {
            return ParseResult::Incomplete;
        }

        let code = match self.buf[2] {
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            _ => None,
        };

        self.consume(3);
        match code {
            Some(code) => ParseResult::Key(RawKey::new(code, Modifier::NONE)),
            None => ParseResult::Skip,
        }
    }

    fn parse_utf8(&mut self) -> ParseResult {
        let first = self.buf[0];
        let expected_len = if first & 0xE0 == 0xC0 {
            2
        } else if first & 0xF0 == 0xE0 {
            3
        } else if first & 0xF8 == 0xF0 {
            4
        } else {
            self.consume(1);
            return ParseResult::Skip;
        };

        if self.buf.len() < expected_len {
            return ParseResult::Incomplete;
        }

        let decoded = std::str::from_utf8(&self.buf[..expected_len])
            .ok()
            .and_then(|s| s.chars().next());
        match decoded {
            Some(ch) => {
                self.consume(expected_len);
                ParseResult::Key(RawKey::new(KeyCode::Char(ch), Modifier::NONE))
            }
            None => {
                self.consume(1);
                ParseResult::Skip
            }
        }
    }

    fn consume(&mut self, n: usize) {
        self.buf.drain(..n);
    }
}

impl Default for InputParser {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helpers
// =============================================================================

enum ParseResult {
    Key(RawKey),
    Incomplete,
    /// Bytes consumed without producing a key.
    Skip,
}

/// Decode CSI modifier parameter (1-based).
fn decode_modifier(param: u32) -> Modifier {
    let val = param.saturating_sub(1);
    let mut m = Modifier::NONE;
    if val & 1 != 0 {
        m |= Modifier::SHIFT;
    }
    if val & 2 != 0 {
        m |= Modifier::ALT;
    }
    if val & 4 != 0 {
        m |= Modifier::CTRL;
    }
    m
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bytes(data: &[u8]) -> Vec<RawKey> {
        InputParser::new().parse(data)
    }

    fn key(code: KeyCode, modifiers: Modifier) -> RawKey {
        RawKey::new(code, modifiers)
    }

    #[test]
    fn test_ascii_chars() {
        let keys = parse_bytes(b"ab");
        assert_eq!(keys, vec![key(KeyCode::Char('a'), Modifier::NONE), key(KeyCode::Char('b'), Modifier::NONE)]);
    }

    #[test]
    fn test_enter_cr_and_lf() {
        assert_eq!(parse_bytes(b"\r")[0], key(KeyCode::Enter, Modifier::NONE));
        assert_eq!(parse_bytes(b"\n")[0], key(KeyCode::Enter, Modifier::NONE));
    }

    #[test]
    fn test_ctrl_c() {
        assert_eq!(parse_bytes(b"\x03")[0], key(KeyCode::Char('c'), Modifier::CTRL));
    }

    #[test]
    fn test_backspace_variants() {
        assert_eq!(parse_bytes(b"\x7f")[0], key(KeyCode::Backspace, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x08")[0], key(KeyCode::Backspace, Modifier::NONE));
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(parse_bytes(b"\x1b[A")[0], key(KeyCode::Up, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1b[B")[0], key(KeyCode::Down, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1b[C")[0], key(KeyCode::Right, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1b[D")[0], key(KeyCode::Left, Modifier::NONE));
    }

    #[test]
    fn test_ss3_arrows() {
        assert_eq!(parse_bytes(b"\x1bOA")[0], key(KeyCode::Up, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1bOH")[0], key(KeyCode::Home, Modifier::NONE));
    }

    #[test]
    fn test_ctrl_arrow() {
        assert_eq!(parse_bytes(b"\x1b[1;5D")[0], key(KeyCode::Left, Modifier::CTRL));
        assert_eq!(parse_bytes(b"\x1b[1;3C")[0], key(KeyCode::Right, Modifier::ALT));
    }

    #[test]
    fn test_home_end_tilde() {
        assert_eq!(parse_bytes(b"\x1b[1~")[0], key(KeyCode::Home, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1b[4~")[0], key(KeyCode::End, Modifier::NONE));
        assert_eq!(parse_bytes(b"\x1b[3~")[0], key(KeyCode::Delete, Modifier::NONE));
    }

    #[test]
    fn test_shift_tab() {
        assert_eq!(parse_bytes(b"\x1b[Z")[0], key(KeyCode::Tab, Modifier::SHIFT));
    }

    #[test]
    fn test_alt_key() {
        assert_eq!(parse_bytes(b"\x1bb")[0], key(KeyCode::Char('b'), Modifier::ALT));
    }

    #[test]
    fn test_utf8_rune() {
        assert_eq!(parse_bytes("é你".as_bytes()), vec![
            key(KeyCode::Char('é'), Modifier::NONE),
            key(KeyCode::Char('你'), Modifier::NONE),
        ]);
    }

    #[test]
    fn test_utf8_split_across_reads() {
        let bytes = "你".as_bytes();
        let mut parser = InputParser::new();
        assert!(parser.parse(&bytes[..1]).is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.parse(&bytes[1..]), vec![key(KeyCode::Char('你'), Modifier::NONE)]);
    }

    #[test]
    fn test_escape_waits_for_more() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b").is_empty());
        assert!(parser.has_pending());
        assert_eq!(parser.parse(b"[D"), vec![key(KeyCode::Left, Modifier::NONE)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_flush_lone_escape() {
        let mut parser = InputParser::new();
        parser.parse(b"\x1b");
        assert_eq!(parser.flush_pending(), vec![key(KeyCode::Escape, Modifier::NONE)]);
        assert!(!parser.has_pending());
    }

    #[test]
    fn test_flush_partial_csi_degrades() {
        let mut parser = InputParser::new();
        assert!(parser.parse(b"\x1b[1;").is_empty());
        assert_eq!(parser.flush_pending(), vec![
            key(KeyCode::Escape, Modifier::NONE),
            key(KeyCode::Char('['), Modifier::NONE),
            key(KeyCode::Char('1'), Modifier::NONE),
            key(KeyCode::Char(';'), Modifier::NONE),
        ]);
    }

    #[test]
    fn test_unknown_csi_skipped() {
        assert_eq!(parse_bytes(b"\x1b[99~x"), vec![key(KeyCode::Char('x'), Modifier::NONE)]);
    }

    #[test]
    fn test_malformed_csi_resumes() {
        assert_eq!(parse_bytes(b"\x1b[1\x03"), vec![
            key(KeyCode::Char('1'), Modifier::NONE),
            key(KeyCode::Char('c'), Modifier::CTRL),
        ]);
    }

    #[test]
    fn test_modifier_decode() {
        assert_eq!(decode_modifier(2), Modifier::SHIFT);
        assert_eq!(decode_modifier(3), Modifier::ALT);
        assert_eq!(decode_modifier(5), Modifier::CTRL);
    }
}
