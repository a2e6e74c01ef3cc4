//! End-to-end tests driving the runtime the way generated parsers do.
//!
//! Exercises a synthetic record format across every source flavor, plus
//! the processing transforms on realistic payloads.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use bitcursor::{process, text, BitCursor, ByteSource, Error, MmapSource, StreamSource};

// ============================================================================
// Fixture Builders
// ============================================================================

/// A record of the synthetic "PKT1" format:
///
/// magic "PKT1", u2le version, u1 flags (3-bit kind MSB-first, 5-bit count),
/// null-terminated name, u4le payload length, XOR-masked payload,
/// u4be checksum-of-sorts trailer.
fn build_packet(version: u16, kind: u8, count: u8, name: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"PKT1");
    out.extend_from_slice(&version.to_le_bytes());
    out.push((kind << 5) | (count & 0x1F));
    out.extend_from_slice(name.as_bytes());
    out.push(0x00);
    let masked = process::xor_one(payload, 0x55);
    out.extend_from_slice(&(masked.len() as u32).to_le_bytes());
    out.extend_from_slice(&masked);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out
}

fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Parse one packet with the runtime, returning (version, kind, count,
/// name, payload).
fn parse_packet<S: ByteSource>(
    cur: &mut BitCursor<S>,
) -> bitcursor::Result<(u16, u8, u8, String, Vec<u8>)> {
    let magic = cur.read_bytes(4)?;
    assert_eq!(magic, b"PKT1");

    let version = cur.read_u2le()?;
    let kind = cur.read_bits_int_be(3)? as u8;
    let count = cur.read_bits_int_be(5)? as u8;
    cur.align_to_byte();

    let name_bytes = cur.read_bytes_term(0x00, false, true, true)?;
    let name = text::bytes_to_str(&name_bytes, "UTF-8")?;

    let payload_len = cur.read_u4le()? as usize;
    let masked = cur.read_bytes(payload_len)?;
    let payload = process::xor_one(&masked, 0x55);

    let expected_len = cur.read_u4be()? as u64;
    assert_eq!(payload.len() as u64, expected_len);

    Ok((version, kind, count, name, payload))
}

// ============================================================================
// Synthetic Format Round-Trips
// ============================================================================

#[test]
fn test_parse_packet_from_memory() {
    let data = build_packet(3, 0b101, 17, "sensor-a", b"temperature=21.5");
    let mut cur = BitCursor::from_bytes(data);

    let (version, kind, count, name, payload) = parse_packet(&mut cur).unwrap();
    assert_eq!(version, 3);
    assert_eq!(kind, 0b101);
    assert_eq!(count, 17);
    assert_eq!(name, "sensor-a");
    assert_eq!(payload, b"temperature=21.5");
    assert!(cur.eof());
}

#[test]
fn test_parse_packet_from_stream() {
    let data = build_packet(1, 0b010, 2, "probe", &[0xDE, 0xAD, 0xBE, 0xEF]);
    let mut cur = BitCursor::from_stream(std::io::Cursor::new(data)).unwrap();

    let (version, kind, count, name, payload) = parse_packet(&mut cur).unwrap();
    assert_eq!((version, kind, count), (1, 0b010, 2));
    assert_eq!(name, "probe");
    assert_eq!(payload, vec![0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_parse_packet_from_mmap() {
    let data = build_packet(7, 0b111, 31, "mapped", b"on-disk payload");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    file.flush().unwrap();

    let source = MmapSource::open(file.path()).unwrap();
    let mut cur = BitCursor::new(source);

    let (version, kind, count, name, payload) = parse_packet(&mut cur).unwrap();
    assert_eq!((version, kind, count), (7, 0b111, 31));
    assert_eq!(name, "mapped");
    assert_eq!(payload, b"on-disk payload");
}

#[test]
fn test_back_to_back_packets() {
    let mut data = build_packet(1, 0, 1, "first", b"one");
    data.extend(build_packet(2, 1, 2, "second", b"two"));
    let mut cur = BitCursor::from_bytes(data);

    let first = parse_packet(&mut cur).unwrap();
    let second = parse_packet(&mut cur).unwrap();
    assert_eq!(first.3, "first");
    assert_eq!(second.3, "second");
    assert!(cur.eof());
}

#[test]
fn test_truncated_packet_fails_cleanly() {
    let mut data = build_packet(1, 0, 1, "cut", b"payload bytes");
    data.truncate(data.len() - 6);
    let mut cur = BitCursor::from_bytes(data);

    let err = parse_packet(&mut cur).unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof { .. }));
    // The cursor is single-shot after failure
    assert!(matches!(cur.read_u1(), Err(Error::InvalidState)));
}

// ============================================================================
// Compressed Payloads
// ============================================================================

#[test]
fn test_zlib_payload_field() {
    let plain = b"compressed body ".repeat(64);
    let compressed = zlib_compress(&plain);

    // Length-prefixed compressed blob, as a generated parser would lay out
    let mut data = (compressed.len() as u32).to_le_bytes().to_vec();
    data.extend_from_slice(&compressed);

    let mut cur = BitCursor::from_bytes(data);
    let blob_len = cur.read_u4le().unwrap() as usize;
    let blob = cur.read_bytes(blob_len).unwrap();
    assert_eq!(process::zlib(&blob).unwrap(), plain);
    assert!(cur.eof());
}

#[test]
fn test_zlib_after_xor_layering() {
    let plain = b"layered transforms".to_vec();
    let masked = process::xor_many(&zlib_compress(&plain), &[0x13, 0x37]).unwrap();

    let unmasked = process::xor_many(&masked, &[0x13, 0x37]).unwrap();
    assert_eq!(process::zlib(&unmasked).unwrap(), plain);
}

#[test]
fn test_corrupt_zlib_payload() {
    let mut compressed = zlib_compress(b"soon to be broken");
    let mid = compressed.len() / 2;
    compressed[mid] ^= 0xFF;
    compressed[mid + 1] ^= 0xFF;

    assert!(matches!(
        process::zlib(&compressed),
        Err(Error::DecompressionError(_))
    ));
}

// ============================================================================
// Bit-Level Interleaving
// ============================================================================

#[test]
fn test_bit_runs_between_aligned_fields() {
    // u1, then 3+5 bits BE, then u2be, then 4+4 bits LE, then u1
    let data = [0x7F, 0b1011_0001, 0x12, 0x34, 0xB1, 0x99];
    let mut cur = BitCursor::from_slice(&data);

    assert_eq!(cur.read_u1().unwrap(), 0x7F);
    assert_eq!(cur.read_bits_int_be(3).unwrap(), 0b101);
    assert_eq!(cur.read_bits_int_be(5).unwrap(), 0b10001);
    assert_eq!(cur.read_u2be().unwrap(), 0x1234);
    assert_eq!(cur.read_bits_int_le(4).unwrap(), 0x1);
    assert_eq!(cur.read_bits_int_le(4).unwrap(), 0xB);
    assert_eq!(cur.read_u1().unwrap(), 0x99);
    assert!(cur.eof());
}

#[test]
fn test_forgotten_alignment_is_an_error() {
    let data = [0b1011_0001, 0x12];
    let mut cur = BitCursor::from_slice(&data);

    cur.read_bits_int_be(3).unwrap();
    assert!(matches!(cur.read_u2be(), Err(Error::UnalignedRead { .. })));
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_stream_source_random_access() {
    let bytes: Vec<u8> = (0u8..64).collect();
    let mut src = StreamSource::new(std::io::Cursor::new(bytes)).unwrap();

    src.seek(32).unwrap();
    assert_eq!(src.read_byte().unwrap(), 32);
    src.seek(0).unwrap();
    assert_eq!(src.read_byte().unwrap(), 0);
    assert_eq!(src.len(), 64);
}

#[test]
fn test_mmap_source_full_read() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"mapped bytes").unwrap();
    file.flush().unwrap();

    let mut src = MmapSource::open(file.path()).unwrap();
    assert_eq!(src.len(), 12);
    assert_eq!(src.read_to_end().unwrap(), b"mapped bytes");
    assert!(src.eof());
}

#[test]
fn test_two_cursors_over_shared_buffer() {
    // Distinct cursors with their own positions over the same bytes
    let data = [0x01u8, 0x02, 0x03, 0x04];
    let mut first = BitCursor::from_slice(&data);
    let mut second = BitCursor::from_slice(&data);

    assert_eq!(first.read_u2le().unwrap(), 0x0201);
    assert_eq!(second.read_u2be().unwrap(), 0x0102);
    assert_eq!(first.pos(), 2);
    assert_eq!(second.pos(), 2);
}
