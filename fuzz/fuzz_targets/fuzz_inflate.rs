#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must either inflate or fail with DecompressionError,
    // never panic. Valid streams round-trip.

    if data.len() > 256 * 1024 {
        return;
    }

    if let Ok(plain) = bitcursor::process::zlib(data) {
        use std::io::Write;
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
        if encoder.write_all(&plain).is_ok() {
            if let Ok(reencoded) = encoder.finish() {
                let replain = bitcursor::process::zlib(&reencoded).unwrap();
                assert_eq!(replain, plain, "Round-trip mismatch");
            }
        }
    }
});
