#![no_main]

use bitcursor::{BitCursor, Error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First bytes drive the op sequence, the rest is the stream.
    // Whatever the sequence, the cursor must never panic, and after its
    // first error every call must report InvalidState.

    if data.len() < 2 {
        return;
    }
    let (ops, stream) = data.split_at(data.len() / 2);
    let data = if stream.len() > 64 * 1024 { &stream[..64 * 1024] } else { stream };

    let mut cur = BitCursor::from_slice(data);
    let mut seen_error = false;

    for &op in ops {
        if op % 12 == 7 {
            // align_to_byte is infallible and legal in any state
            cur.align_to_byte();
            continue;
        }

        let result: Result<(), Error> = match op % 12 {
            0 => cur.read_u1().map(drop),
            1 => cur.read_u2le().map(drop),
            2 => cur.read_u4be().map(drop),
            3 => cur.read_s8le().map(drop),
            4 => cur.read_f4be().map(drop),
            5 => cur.read_bits_int_be(u32::from(op / 12) + 1).map(drop),
            6 => cur.read_bits_int_le(u32::from(op / 12) + 1).map(drop),
            8 => cur.seek(u64::from(op)).map(drop),
            9 => cur.read_bytes(usize::from(op)).map(drop),
            10 => cur.read_bytes_term(op, op & 1 != 0, op & 2 != 0, op & 4 != 0).map(drop),
            _ => cur.read_bytes_full().map(drop),
        };

        if seen_error {
            assert!(matches!(result, Err(Error::InvalidState)));
        }
        if result.is_err() {
            seen_error = true;
            assert!(cur.is_failed());
        }
    }
});
