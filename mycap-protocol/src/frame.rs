//! Command frame buffer
//!
//! A frame holds exactly one received line:
//! - Bytes up to the `\n` terminator (the terminator itself is stripped)
//! - A null byte appended where the terminator was
//!
//! Lines that are empty or do not fit in [`FRAME_CAPACITY`] together with
//! the appended null are dropped, never truncated. [`LineReader`] also
//! drops whatever is left of such a line, up to and including its
//! terminator, so no tail is ever framed as a command of its own.

use mycap_hal::LineTransport;

use crate::token::Tokenizer;

/// Frame buffer capacity in bytes, including the appended null
pub const FRAME_CAPACITY: usize = 128;

/// Byte that ends a line on the wire
pub const LINE_TERMINATOR: u8 = b'\n';

/// One received command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    buf: [u8; FRAME_CAPACITY],
    /// Bytes read from the wire, excluding the appended null
    len: usize,
}

/// Frames lines read from a [`LineTransport`]
///
/// Keeps track of whether the wire is in the middle of a line that was
/// already dropped (too long, timed out or failed). While it is, bytes are
/// thrown away up to and including the next terminator.
#[derive(Debug, Clone, Default)]
pub struct LineReader {
    discarding: bool,
}

impl LineReader {
    pub const fn new() -> Self {
        Self { discarding: false }
    }

    /// Check whether the reader is skipping the rest of a dropped line
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Try to read one line from the transport
    ///
    /// Returns `None` immediately when nothing is pending. Otherwise reads
    /// at most one line and returns `None` if it was empty, did not fit,
    /// timed out, belonged to a dropped line, or the transport failed.
    pub fn try_read_line<T: LineTransport>(&mut self, transport: &mut T) -> Option<CommandFrame> {
        if !transport.bytes_available() {
            return None;
        }

        let mut buf = [0u8; FRAME_CAPACITY];
        let read = match transport.read_until(LINE_TERMINATOR, &mut buf) {
            Ok(read) => read,
            Err(_) => {
                // Unknown how much of the line was consumed
                self.discarding = true;
                return None;
            }
        };

        if self.discarding {
            self.discarding = !read.terminated;
            return None;
        }
        if !read.terminated {
            self.discarding = true;
            return None;
        }

        CommandFrame::terminate(buf, read.len)
    }
}

impl CommandFrame {
    /// Build a frame from a line that has already been received
    ///
    /// `line` must not contain the line terminator. The same size rules
    /// as [`LineReader::try_read_line`] apply.
    pub fn from_line(line: &[u8]) -> Option<Self> {
        if line.len() >= FRAME_CAPACITY {
            return None;
        }

        let mut buf = [0u8; FRAME_CAPACITY];
        buf[..line.len()].copy_from_slice(line);
        Self::terminate(buf, line.len())
    }

    fn terminate(mut buf: [u8; FRAME_CAPACITY], len: usize) -> Option<Self> {
        if len == 0 || len >= FRAME_CAPACITY {
            return None;
        }

        buf[len] = 0;
        Some(Self { buf, len })
    }

    /// Number of bytes received, excluding the appended null
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the frame holds no bytes (never true for a read frame)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Received bytes, excluding the appended null
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Tokenizer over the received bytes and the appended null
    pub fn tokens(&self) -> Tokenizer<'_> {
        Tokenizer::new(&self.buf[..=self.len])
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CommandFrame[{=[u8]:a}]", self.as_bytes());
    }
}
