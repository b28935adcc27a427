//! Decode error types

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before the value was complete.
    #[error("unexpected end of input")]
    Truncated,

    /// The bytes are present but do not form a valid value ("irregular data").
    #[error("irregular data: {0}")]
    Malformed(&'static str),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
