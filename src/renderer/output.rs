//! Per-pass byte batching.
//!
//! Each render pass collects its whole delta here and the session sends it
//! with one write, so the terminal never shows half a frame. The buffer is
//! reset at the start of every pass and its allocation reused.

use std::io::{self, Write};

/// Initial allocation; a typical prompt delta fits without growing.
const PASS_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
    passes: u64,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self { bytes: Vec::with_capacity(PASS_CAPACITY), passes: 0 }
    }

    /// Drop the previous pass's bytes and start a new pass.
    pub fn begin_pass(&mut self) {
        self.bytes.clear();
        self.passes += 1;
    }

    /// Passes started so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes of the current pass.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_starts_empty() {
        let mut out = OutputBuffer::new();
        out.write_all(b"\x1b[2K").unwrap();
        assert_eq!(out.len(), 4);
        out.begin_pass();
        assert!(out.is_empty());
        assert_eq!(out.passes(), 1);
    }

    #[test]
    fn allocation_is_reused() {
        let mut out = OutputBuffer::new();
        out.write_all(&[b'x'; 64]).unwrap();
        let capacity = out.bytes.capacity();
        out.begin_pass();
        out.write_all(b"y").unwrap();
        assert_eq!(out.bytes.capacity(), capacity);
        assert_eq!(out.as_bytes(), b"y");
    }
}
