use std::io::{Read, Seek, SeekFrom};

use crate::error::{Error, Result};
use crate::source::{check_seek, ByteSource};

/// Byte source over an arbitrary `Read + Seek` stream.
///
/// The total length is determined once at construction by seeking to the
/// end; backward seeks are delegated to the underlying stream. Reads block
/// if the stream blocks.
pub struct StreamSource<R: Read + Seek> {
    inner: R,
    len: u64,
    pos: u64,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap `inner`, rewinding it to the start.
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        log::trace!("stream source opened, {len} bytes");
        Ok(Self { inner, len, pos: 0 })
    }

    /// Consume the source, returning the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> ByteSource for StreamSource<R> {
    fn len(&self) -> u64 {
        self.len
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        check_seek(pos, self.len)?;
        self.inner.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let needed = buf.len() as u64;
        if needed > self.remaining() {
            return Err(Error::UnexpectedEof { needed, available: self.remaining() });
        }
        self.inner.read_exact(buf)?;
        self.pos += needed;
        Ok(())
    }
}
