//! Byte sources backing a cursor.
//!
//! A [`ByteSource`] is a finite, seekable, read-only view over bytes. The
//! in-memory implementation covers owned buffers, borrowed slices and
//! memory-mapped files; [`StreamSource`] adapts any `Read + Seek` stream.

mod memory;
mod stream;

pub use memory::{MemSource, MmapSource, SliceSource};
pub use stream::StreamSource;

use crate::error::{Error, Result};

/// A finite, seekable, read-only byte stream.
///
/// The position is measured in whole bytes, satisfies `0 <= pos <= len`,
/// and changes only through [`seek`](ByteSource::seek) or successful reads.
pub trait ByteSource {
    /// Total byte count. Constant-time.
    fn len(&self) -> u64;

    /// Current read position.
    fn pos(&self) -> u64;

    /// Set the read position. `pos == len()` is legal and means EOF.
    fn seek(&mut self, pos: u64) -> Result<()>;

    /// Fill `buf` from the current position, advancing by `buf.len()`.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// True when no bytes are left to read.
    fn eof(&self) -> bool {
        self.pos() >= self.len()
    }

    /// True for a zero-length source.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left between the current position and the end.
    fn remaining(&self) -> u64 {
        self.len() - self.pos()
    }

    /// Read a single byte.
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read exactly `n` bytes into a fresh buffer.
    fn read_vec(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read from the current position to the end of the source.
    fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let n = self.remaining();
        self.read_vec(n as usize)
    }
}

/// Shared bounds check for seeks.
pub(crate) fn check_seek(pos: u64, len: u64) -> Result<()> {
    if pos > len {
        return Err(Error::OutOfBounds { pos, len });
    }
    Ok(())
}
