//! Line scanner
//!
//! Reads a stream through a fixed-size buffer and hands out one line at a
//! time, reassembling lines that straddle read boundaries.

use std::io::{ErrorKind, Read};

use crate::error::{HcfgError, Result};

/// Default scanner buffer size (in bytes)
pub const DEFAULT_LINE_BUFFER: usize = 4096;

/// One unit of scanner output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedLine {
    /// A complete line, terminator stripped
    Line { number: usize, text: Vec<u8> },

    /// A line too long for the buffer; its bytes were skipped
    Overflow { number: usize },
}

/// Bounded-buffer line reader over any `Read`
///
/// The scanner borrows nothing beyond the reader it was given and never
/// closes it; pass `&mut file` to keep ownership with the caller.
pub struct LineScanner<R> {
    reader: R,
    /// Fixed-size buffer; `buf.len()` is the longest line (plus terminator) accepted
    buf: Vec<u8>,
    /// Start of unconsumed data
    head: usize,
    /// End of valid data
    tail: usize,
    /// Number of the last line handed out (1-based)
    line: usize,
    eof: bool,
    failed: bool,
}

impl<R: Read> LineScanner<R> {
    /// Create a scanner with the default buffer size
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_LINE_BUFFER)
    }

    /// Create a scanner whose buffer holds `capacity` bytes
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0u8; capacity.max(2)],
            head: 0,
            tail: 0,
            line: 0,
            eof: false,
            failed: false,
        }
    }

    /// Number of the most recently returned line
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Produce the next line, or `None` at end of stream
    pub fn next_line(&mut self) -> std::io::Result<Option<ScannedLine>> {
        loop {
            if let Some(pos) = self.buf[self.head..self.tail]
                .iter()
                .position(|&b| b == b'\n')
            {
                let start = self.head;
                let end = start + pos;
                self.head = end + 1;
                self.line += 1;
                return Ok(Some(ScannedLine::Line {
                    number: self.line,
                    text: self.buf[start..end].to_vec(),
                }));
            }

            let pending = self.tail - self.head;

            // Full buffer with no newline: report the line and skip past it
            if pending == self.buf.len() {
                self.line += 1;
                let number = self.line;
                self.skip_to_next_line()?;
                return Ok(Some(ScannedLine::Overflow { number }));
            }

            if self.eof {
                if pending == 0 {
                    return Ok(None);
                }
                let text = self.buf[self.head..self.tail].to_vec();
                self.head = self.tail;
                self.line += 1;
                return Ok(Some(ScannedLine::Line {
                    number: self.line,
                    text,
                }));
            }

            self.compact();
            let n = self.fill()?;
            if n == 0 {
                self.eof = true;
            } else {
                self.tail += n;
            }
        }
    }

    /// Move unconsumed bytes to the front of the buffer
    fn compact(&mut self) {
        if self.head > 0 {
            self.buf.copy_within(self.head..self.tail, 0);
            self.tail -= self.head;
            self.head = 0;
        }
    }

    /// Read into the free tail of the buffer, retrying interrupted reads
    fn fill(&mut self) -> std::io::Result<usize> {
        loop {
            match self.reader.read(&mut self.buf[self.tail..]) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Discard buffered data and read forward until just past a newline
    fn skip_to_next_line(&mut self) -> std::io::Result<()> {
        self.head = 0;
        self.tail = 0;

        while !self.eof {
            let n = self.fill()?;
            if n == 0 {
                self.eof = true;
                break;
            }

            if let Some(pos) = self.buf[..n].iter().position(|&b| b == b'\n') {
                self.head = pos + 1;
                self.tail = n;
                break;
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for LineScanner<R> {
    type Item = Result<ScannedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.next_line() {
            Ok(line) => line.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(HcfgError::from(e)))
            }
        }
    }
}
