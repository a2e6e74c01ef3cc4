//! Post-read byte-array transforms.
//!
//! Generated parsers apply these between the raw read and field
//! interpretation. All functions are pure and return fresh buffers.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};

/// XOR every byte with a single-byte key. Applying the same key twice
/// restores the input.
pub fn xor_one(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|&b| b ^ key).collect()
}

/// XOR with a cycling multi-byte key: output byte `i` is
/// `data[i] ^ key[i % key.len()]`.
pub fn xor_many(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::InvalidArgument("empty XOR key".into()));
    }
    Ok(data.iter().zip(key.iter().cycle()).map(|(&b, &k)| b ^ k).collect())
}

/// Rotate each byte left by `amount` bits (taken mod 8).
///
/// Only `group_size == 1` is supported; wider groups have no defined byte
/// order and are rejected.
pub fn rotate_left(data: &[u8], amount: u32, group_size: usize) -> Result<Vec<u8>> {
    if group_size != 1 {
        return Err(Error::InvalidArgument(format!(
            "rotate group size {group_size} unsupported (must be 1)"
        )));
    }
    let amount = amount % 8;
    Ok(data.iter().map(|&b| b.rotate_left(amount)).collect())
}

/// Decompress a zlib/DEFLATE stream.
pub fn zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| Error::DecompressionError(e.to_string()))?;
    log::trace!("inflated {} bytes to {}", data.len(), out.len());
    Ok(out)
}
