//! Helpers backing derived expressions in generated parsers.

use crate::error::{Error, Result};

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Euclidean modulus: the result is always in `[0, |b|)`, unlike the `%`
/// operator's truncated remainder for negative operands.
pub fn modulo(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(Error::DivisionByZero);
    }
    // checked_rem_euclid is None only for i64::MIN % -1, whose remainder is 0
    Ok(a.checked_rem_euclid(b).unwrap_or(0))
}

/// Render `value` in the given base (2-36), lowercase digits, `-` prefix
/// for negatives.
pub fn int_to_string(value: i64, base: u32) -> Result<String> {
    if !(2..=36).contains(&base) {
        return Err(Error::InvalidArgument(format!("base {base} outside 2..=36")));
    }
    if value == 0 {
        return Ok("0".to_string());
    }

    let mut magnitude = value.unsigned_abs();
    let mut out = Vec::new();
    while magnitude > 0 {
        out.push(DIGITS[(magnitude % u64::from(base)) as usize]);
        magnitude /= u64::from(base);
    }
    if value < 0 {
        out.push(b'-');
    }
    out.reverse();
    Ok(out.iter().map(|&b| b as char).collect())
}
