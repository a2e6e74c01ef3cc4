//! Character-set transcoding for string fields.
//!
//! The base build accepts only `ASCII` and `UTF-8`. With the `encoding`
//! cargo feature, any WHATWG-labelled character set resolves through
//! `encoding_rs`.

use crate::error::{Error, Result};

/// Convert `bytes` to text using the named character set.
///
/// Encoding labels match ASCII-case-insensitively. Unknown labels and
/// input rejected by the decoder both fail with `EncodingError`.
pub fn bytes_to_str(bytes: &[u8], encoding: &str) -> Result<String> {
    // ASCII and UTF-8 resolve here in every build; under WHATWG rules the
    // "ascii" label would otherwise alias to windows-1252.
    if encoding.eq_ignore_ascii_case("ascii") || encoding.eq_ignore_ascii_case("us-ascii") {
        return decode_ascii(bytes);
    }
    if encoding.eq_ignore_ascii_case("utf-8") || encoding.eq_ignore_ascii_case("utf8") {
        return String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::EncodingError(format!(
                "invalid UTF-8 after byte {}",
                e.utf8_error().valid_up_to()
            ))
        });
    }
    decode_labelled(bytes, encoding)
}

fn decode_ascii(bytes: &[u8]) -> Result<String> {
    if let Some(idx) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(Error::EncodingError(format!(
            "non-ASCII byte 0x{:02x} at offset {idx}",
            bytes[idx]
        )));
    }
    Ok(bytes.iter().map(|&b| b as char).collect())
}

#[cfg(feature = "encoding")]
fn decode_labelled(bytes: &[u8], encoding: &str) -> Result<String> {
    let enc = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .ok_or_else(|| Error::EncodingError(format!("unknown encoding: {encoding}")))?;
    let (decoded, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(Error::EncodingError(format!("input rejected by {} decoder", enc.name())));
    }
    Ok(decoded.into_owned())
}

#[cfg(not(feature = "encoding"))]
fn decode_labelled(_bytes: &[u8], encoding: &str) -> Result<String> {
    Err(Error::EncodingError(format!(
        "unknown encoding: {encoding} (built without the `encoding` feature)"
    )))
}
