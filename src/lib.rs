pub mod cursor;
pub mod error;
pub mod expr;
pub mod process;
pub mod source;
pub mod text;

pub use cursor::BitCursor;
pub use error::{Error, Result};
pub use source::{ByteSource, MemSource, MmapSource, SliceSource, StreamSource};
pub use text::bytes_to_str;
