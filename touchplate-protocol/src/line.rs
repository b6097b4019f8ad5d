//! Serial line accumulation.
//!
//! Console bytes arrive one at a time from a non-blocking read; they are
//! buffered here until a CR or LF terminator, then the completed line is
//! handed to the dispatcher in one piece. Bytes past the buffer capacity
//! are dropped so a runaway sender cannot wedge the console.

use heapless::{String, Vec};

/// Serial input buffer capacity
pub const LINE_BUFFER_SIZE: usize = 256;

/// Accumulates console bytes into dispatchable lines
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8, LINE_BUFFER_SIZE>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed a single byte.
    ///
    /// Returns the completed line when `byte` is a terminator and the
    /// buffer holds something dispatchable. Empty lines (a bare CR/LF, or
    /// the LF of a CRLF pair) return `None`. Lines with invalid UTF-8 are
    /// discarded whole.
    pub fn feed(&mut self, byte: u8) -> Option<String<LINE_BUFFER_SIZE>> {
        if byte == b'\r' || byte == b'\n' {
            if self.buf.is_empty() {
                return None;
            }
            let line = core::str::from_utf8(&self.buf).ok().map(|s| {
                let mut out = String::new();
                // s.len() <= LINE_BUFFER_SIZE by construction
                let _ = out.push_str(s);
                out
            });
            self.buf.clear();
            return line;
        }

        // Truncate instead of wrapping; the terminator still flushes
        let _ = self.buf.push(byte);
        None
    }

    /// Discard any partially accumulated input
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Number of buffered bytes awaiting a terminator
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
