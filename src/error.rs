use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors from streaming sources
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Stream exhaustion and navigation errors
    #[error("Unexpected end of stream: needed {needed} more bytes, {available} available")]
    UnexpectedEof { needed: u64, available: u64 },

    #[error("Seek out of bounds: position {pos} exceeds stream length {len}")]
    OutOfBounds { pos: u64, len: u64 },

    // Bit buffer errors
    #[error("Byte-aligned read attempted with {bits_left} residual bits buffered")]
    UnalignedRead { bits_left: u32 },

    // Argument validation errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // String decoding errors
    #[error("Encoding error: {0}")]
    EncodingError(String),

    // Processor errors
    #[error("Decompression failed: {0}")]
    DecompressionError(String),

    #[error("Division by zero in modulus")]
    DivisionByZero,

    // Cursor reuse after a prior failure
    #[error("Operation on a failed cursor")]
    InvalidState,
}

pub type Result<T> = std::result::Result<T, Error>;
