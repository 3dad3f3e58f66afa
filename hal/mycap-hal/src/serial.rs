//! Serial line transport abstractions
//!
//! Provides the line-oriented read interface the command parser consumes,
//! plus an adapter over any `embedded-io` reader.

use embedded_io::{Read, ReadReady};

use crate::clock::Clock;

/// Result of one bounded line read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineRead {
    /// Bytes stored in the caller's buffer
    pub len: usize,
    /// Whether the read ended on the terminator
    ///
    /// `false` means the buffer filled up, the read timed out or the
    /// reader ran dry, so the rest of the line is still on the wire.
    pub terminated: bool,
}

impl LineRead {
    /// A read that ended on the terminator
    pub const fn complete(len: usize) -> Self {
        Self {
            len,
            terminated: true,
        }
    }

    /// A read that stopped before the terminator
    pub const fn partial(len: usize) -> Self {
        Self {
            len,
            terminated: false,
        }
    }
}

/// Line-oriented serial input
///
/// Mirrors the usual microcontroller serial API: a cheap "is anything
/// pending" check and a bounded read of one line.
pub trait LineTransport {
    /// Error type for receive operations
    type Error;

    /// Check whether at least one byte is waiting to be read
    ///
    /// Must not block.
    fn bytes_available(&mut self) -> bool;

    /// Read bytes into `buf` until `terminator` is seen
    ///
    /// The terminator is consumed but not stored. Reading stops early when
    /// `buf` is full or the transport's read timeout expires; the returned
    /// [`LineRead`] tells the two cases apart from a complete line.
    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<LineRead, Self::Error>;
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    type Error = T::Error;

    fn bytes_available(&mut self) -> bool {
        (**self).bytes_available()
    }

    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<LineRead, Self::Error> {
        (**self).read_until(terminator, buf)
    }
}

/// [`LineTransport`] over an `embedded-io` reader
///
/// Bytes are pulled one at a time while the reader reports them ready.
/// When it stops reporting ready, the read waits on `clock` until the
/// configured timeout elapses and then reports a partial read.
pub struct IoLineTransport<R, C> {
    reader: R,
    clock: C,
    timeout_ms: u64,
}

impl<R, C> IoLineTransport<R, C>
where
    R: Read + ReadReady,
    C: Clock,
{
    /// Wrap a reader with the given per-line timeout
    pub fn new(reader: R, clock: C, timeout_ms: u32) -> Self {
        Self {
            reader,
            clock,
            timeout_ms: timeout_ms as u64,
        }
    }

    /// Give back the wrapped reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R, C> LineTransport for IoLineTransport<R, C>
where
    R: Read + ReadReady,
    C: Clock,
{
    type Error = R::Error;

    fn bytes_available(&mut self) -> bool {
        self.reader.read_ready().unwrap_or(false)
    }

    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<LineRead, Self::Error> {
        let started = self.clock.now_ms();
        let mut count = 0;
        let mut byte = [0u8; 1];

        while count < buf.len() {
            if !self.reader.read_ready()? {
                if self.clock.now_ms().wrapping_sub(started) >= self.timeout_ms {
                    break;
                }
                continue;
            }

            if self.reader.read(&mut byte)? == 0 {
                break;
            }
            if byte[0] == terminator {
                return Ok(LineRead::complete(count));
            }

            buf[count] = byte[0];
            count += 1;
        }

        Ok(LineRead::partial(count))
    }
}
