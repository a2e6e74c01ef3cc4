use crate::cursor::BitCursor;
use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Scan granularity for terminator searches.
const SCAN_CHUNK: u64 = 4096;

impl<S: ByteSource> BitCursor<S> {
    /// Read exactly `n` bytes. Requires byte alignment.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.check_healthy()?;
        self.check_aligned()?;
        self.source.read_vec(n).map_err(|e| self.fail(e))
    }

    /// Read from the current position to the end of the source.
    pub fn read_bytes_full(&mut self) -> Result<Vec<u8>> {
        self.check_healthy()?;
        self.check_aligned()?;
        self.source.read_to_end().map_err(|e| self.fail(e))
    }

    /// Read bytes up to the first occurrence of `term`.
    ///
    /// `include` appends the terminator to the returned bytes; `consume`
    /// advances the cursor past it (otherwise the cursor stops on it).
    /// When the source ends before `term` is found, `eos_error` selects
    /// between failing with `UnexpectedEof` and returning everything read.
    pub fn read_bytes_term(
        &mut self,
        term: u8,
        include: bool,
        consume: bool,
        eos_error: bool,
    ) -> Result<Vec<u8>> {
        self.check_healthy()?;
        self.check_aligned()?;

        let mut out = Vec::new();
        loop {
            let chunk_len = self.source.remaining().min(SCAN_CHUNK) as usize;
            if chunk_len == 0 {
                if eos_error {
                    return Err(self.fail(Error::UnexpectedEof { needed: 1, available: 0 }));
                }
                return Ok(out);
            }

            let chunk = match self.source.read_vec(chunk_len) {
                Ok(chunk) => chunk,
                Err(e) => return Err(self.fail(e)),
            };

            match memchr::memchr(term, &chunk) {
                Some(idx) => {
                    out.extend_from_slice(&chunk[..idx]);
                    if include {
                        out.push(term);
                    }
                    // The chunk overshot the terminator; step back onto it
                    // (or just past it when consuming).
                    let overshoot = (chunk_len - idx) as u64;
                    let mut pos = self.source.pos() - overshoot;
                    if consume {
                        pos += 1;
                    }
                    if let Err(e) = self.source.seek(pos) {
                        return Err(self.fail(e));
                    }
                    return Ok(out);
                }
                None => out.extend_from_slice(&chunk),
            }
        }
    }
}
