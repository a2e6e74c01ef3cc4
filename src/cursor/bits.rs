//! Sub-byte reads in both bit-packing conventions.
//!
//! Refills pull the minimal number of whole bytes from the source, so at
//! most 7 residual bits are ever buffered between calls and the 64-bit
//! accumulator cannot overflow.

use crate::cursor::BitCursor;
use crate::error::{Error, Result};
use crate::source::ByteSource;

/// Mask selecting the low `n` bits, valid for `n` up to 64.
#[inline]
fn low_mask(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

impl<S: ByteSource> BitCursor<S> {
    /// Read `n` bits (1-64) MSB-first: bit 7 of the first byte is read
    /// first. The value occupies the low `n` bits of the result.
    pub fn read_bits_int_be(&mut self, n: u32) -> Result<u64> {
        self.check_healthy()?;
        self.check_bit_width(n)?;

        if n <= self.bits_left {
            // Buffered bits yield MSB-first: take from the top
            let keep = self.bits_left - n;
            let result = self.bits >> keep;
            self.bits &= low_mask(keep);
            self.bits_left = keep;
            return Ok(result);
        }

        let needed = n - self.bits_left;
        let extra = ((needed + 7) / 8) as usize;
        let mut buf = [0u8; 8];
        if let Err(e) = self.source.read_exact(&mut buf[..extra]) {
            return Err(self.fail(e));
        }

        let mut acc = 0u64;
        for &byte in &buf[..extra] {
            acc = (acc << 8) | u64::from(byte);
        }

        // Old residual bits are the most significant part of the result;
        // `leftover` fresh low bits stay buffered for the next call.
        let leftover = 8 * extra as u32 - needed;
        let result = if self.bits_left == 0 {
            acc >> leftover
        } else {
            (self.bits << needed) | (acc >> leftover)
        };
        self.bits = acc & low_mask(leftover);
        self.bits_left = leftover;
        Ok(result)
    }

    /// Read `n` bits (1-64) LSB-first: bit 0 of the first byte is read
    /// first. The value occupies the low `n` bits of the result.
    pub fn read_bits_int_le(&mut self, n: u32) -> Result<u64> {
        self.check_healthy()?;
        self.check_bit_width(n)?;

        if n <= self.bits_left {
            let result = self.bits & low_mask(n);
            self.bits >>= n;
            self.bits_left -= n;
            return Ok(result);
        }

        let needed = n - self.bits_left;
        let extra = ((needed + 7) / 8) as usize;
        let mut buf = [0u8; 8];
        if let Err(e) = self.source.read_exact(&mut buf[..extra]) {
            return Err(self.fail(e));
        }

        // Each fresh byte splices in above the bits already buffered
        let mut acc = 0u64;
        for (i, &byte) in buf[..extra].iter().enumerate() {
            acc |= u64::from(byte) << (8 * i as u32);
        }

        let leftover = 8 * extra as u32 - needed;
        let result = if self.bits_left == 0 {
            acc & low_mask(n)
        } else {
            self.bits | ((acc & low_mask(needed)) << self.bits_left)
        };
        self.bits = if needed < 64 { acc >> needed } else { 0 };
        self.bits_left = leftover;
        Ok(result)
    }

    /// Discard any residual bits, restoring byte alignment. Needed before
    /// any byte-granular read that follows a bit-level read.
    pub fn align_to_byte(&mut self) {
        self.bits = 0;
        self.bits_left = 0;
    }

    fn check_bit_width(&mut self, n: u32) -> Result<()> {
        if n == 0 || n > 64 {
            return Err(self.fail(Error::InvalidArgument(format!(
                "bit width {n} outside 1..=64"
            ))));
        }
        Ok(())
    }
}
