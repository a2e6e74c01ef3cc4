//! The bit-level cursor and its typed decoders.
//!
//! [`BitCursor`] overlays a [`ByteSource`] with a residual bit buffer so
//! generated parsers can mix byte-aligned primitive reads with sub-byte
//! fields in either bit ordering. A cursor that has returned an error is
//! permanently failed; every later call reports [`Error::InvalidState`].

mod bits;
mod bytes;

use std::path::Path;

use crate::error::{Error, Result};
use crate::source::{ByteSource, MemSource, MmapSource, SliceSource, StreamSource};

/// Stateful reader combining a byte source with a residual bit buffer.
///
/// Byte-granular decoders require the cursor to be byte-aligned
/// (`bits_left() == 0`); mixing them with bit-level reads takes an explicit
/// [`align_to_byte`](BitCursor::align_to_byte) in between.
pub struct BitCursor<S: ByteSource> {
    source: S,
    /// Bits pulled from the source but not yet consumed.
    bits: u64,
    /// Number of valid bits in `bits` (0-7 between calls).
    bits_left: u32,
    /// Set on the first error; latches the cursor shut.
    failed: bool,
}

impl<'a> BitCursor<SliceSource<'a>> {
    /// Cursor over a borrowed byte slice.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self::new(MemSource::new(data))
    }
}

impl BitCursor<MemSource<Vec<u8>>> {
    /// Cursor over an owned byte buffer.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::new(MemSource::new(data))
    }
}

impl BitCursor<MmapSource> {
    /// Cursor over a read-only memory-mapped file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(MmapSource::open(path)?))
    }
}

impl<R: std::io::Read + std::io::Seek> BitCursor<StreamSource<R>> {
    /// Cursor over an arbitrary seekable stream.
    pub fn from_stream(inner: R) -> Result<Self> {
        Ok(Self::new(StreamSource::new(inner)?))
    }
}

impl<S: ByteSource> BitCursor<S> {
    /// Bind a cursor to `source`, starting byte-aligned at its current
    /// position.
    pub fn new(source: S) -> Self {
        Self { source, bits: 0, bits_left: 0, failed: false }
    }

    /// Total length of the underlying source.
    pub fn len(&self) -> u64 {
        self.source.len()
    }

    /// True for a zero-length source.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Current byte position in the underlying source.
    ///
    /// Bytes pulled into the bit buffer count as consumed.
    pub fn pos(&self) -> u64 {
        self.source.pos()
    }

    /// Bytes left in the underlying source.
    pub fn remaining(&self) -> u64 {
        self.source.remaining()
    }

    /// True when the source is exhausted and no buffered bits remain.
    pub fn eof(&self) -> bool {
        self.bits_left == 0 && self.source.eof()
    }

    /// Number of residual bits buffered from bit-level reads.
    pub fn bits_left(&self) -> u32 {
        self.bits_left
    }

    /// True once any operation has failed.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Move to an absolute byte position, discarding any buffered bits.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.check_healthy()?;
        self.bits = 0;
        self.bits_left = 0;
        match self.source.seek(pos) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Consume the cursor, returning the underlying source.
    pub fn into_inner(self) -> S {
        self.source
    }

    // ---- primitive integer decoders ------------------------------------

    pub fn read_u1(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_s1(&mut self) -> Result<i8> {
        Ok(self.read_array::<1>()?[0] as i8)
    }

    pub fn read_u2le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u2be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_s2le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_s2be(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u4le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u4be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_s4le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_s4be(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u8le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u8be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_s8le(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_s8be(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    // ---- IEEE-754 float decoders ---------------------------------------

    pub fn read_f4le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f4be(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f8le(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f8be(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    // ---- internals -----------------------------------------------------

    /// Byte-granular read funnel: alignment-checked, width-exact.
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.check_healthy()?;
        self.check_aligned()?;
        let mut buf = [0u8; N];
        match self.source.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn check_healthy(&self) -> Result<()> {
        if self.failed {
            return Err(Error::InvalidState);
        }
        Ok(())
    }

    fn check_aligned(&mut self) -> Result<()> {
        if self.bits_left > 0 {
            let bits_left = self.bits_left;
            return Err(self.fail(Error::UnalignedRead { bits_left }));
        }
        Ok(())
    }

    /// Latch the failure state, passing the error through.
    fn fail(&mut self, err: Error) -> Error {
        self.failed = true;
        err
    }
}
