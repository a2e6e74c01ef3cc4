use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Error, Result};
use crate::source::{check_seek, ByteSource};

/// Whole-buffer-in-memory byte source.
///
/// Generic over anything that dereferences to a byte slice, so the same
/// implementation serves owned buffers (`Vec<u8>`), borrowed slices and
/// memory-mapped files.
pub struct MemSource<T: AsRef<[u8]>> {
    data: T,
    pos: u64,
}

/// Source borrowing an in-memory byte slice.
pub type SliceSource<'a> = MemSource<&'a [u8]>;

/// Source backed by a read-only memory-mapped file.
pub type MmapSource = MemSource<Mmap>;

impl<T: AsRef<[u8]>> MemSource<T> {
    /// Create a source over `data`, positioned at the start.
    pub fn new(data: T) -> Self {
        Self { data, pos: 0 }
    }

    /// Borrow the underlying buffer.
    pub fn get_ref(&self) -> &T {
        &self.data
    }

    /// Consume the source, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl MmapSource {
    /// Map `path` read-only and wrap it as a source.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // Safety: the mapping is read-only; the file must not be truncated
        // while the source is alive.
        let map = unsafe { Mmap::map(&file)? };
        log::debug!("mapped {} ({} bytes)", path.as_ref().display(), map.len());
        Ok(Self::new(map))
    }
}

impl<T: AsRef<[u8]>> ByteSource for MemSource<T> {
    fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        check_seek(pos, self.len())?;
        self.pos = pos;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let needed = buf.len() as u64;
        if needed > self.remaining() {
            return Err(Error::UnexpectedEof { needed, available: self.remaining() });
        }
        let start = self.pos as usize;
        buf.copy_from_slice(&self.data.as_ref()[start..start + buf.len()]);
        self.pos += needed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_position() {
        let mut src = MemSource::new(vec![1u8, 2, 3, 4]);
        let mut buf = [0u8; 2];

        src.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        assert_eq!(src.pos(), 2);
        assert_eq!(src.remaining(), 2);
    }

    #[test]
    fn test_seek_bounds() {
        let mut src = SliceSource::new(&[0u8; 4]);

        src.seek(4).unwrap();
        assert!(src.eof());

        let err = src.seek(5).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { pos: 5, len: 4 }));
    }

    #[test]
    fn test_short_read_is_eof_error() {
        let mut src = SliceSource::new(&[0xAB, 0xCD]);
        let mut buf = [0u8; 4];

        let err = src.read_exact(&mut buf).unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { needed: 4, available: 2 }));
        // Position untouched on a failed read
        assert_eq!(src.pos(), 0);
    }

    #[test]
    fn test_read_to_end() {
        let mut src = MemSource::new(vec![1u8, 2, 3, 4, 5]);
        src.seek(2).unwrap();

        assert_eq!(src.read_to_end().unwrap(), vec![3, 4, 5]);
        assert!(src.eof());
        // A second read-to-end at EOF yields an empty buffer
        assert_eq!(src.read_to_end().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_backward_seek_rereads() {
        let mut src = MemSource::new(vec![9u8, 8, 7]);
        assert_eq!(src.read_byte().unwrap(), 9);
        src.seek(0).unwrap();
        assert_eq!(src.read_byte().unwrap(), 9);
    }
}
