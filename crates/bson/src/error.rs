//! BSON decoder error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BsonError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unsupported BSON element type 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid size {0}")]
    InvalidSize(i32),
    #[error("{0} trailing bytes after document")]
    TrailingBytes(usize),
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),
    #[error("document nesting exceeds {0} levels")]
    TooDeep(usize),
}
