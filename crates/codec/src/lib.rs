//! Deterministic binary codec for contract records.
//!
//! Every persisted record and every call payload goes through this codec.
//! Integers use a canonical compact varuint, variable data is length
//! prefixed and booleans take exactly one byte, so two replicas encoding the
//! same value always produce the same bytes.

pub mod error;
pub mod sink;
pub mod source;

pub use error::{DecodeError, Result};
pub use sink::ZeroCopySink;
pub use source::ZeroCopySource;

/// Canonical single-byte `true` returned by boolean-style calls.
pub const BYTE_TRUE: [u8; 1] = [1];
/// Canonical single-byte `false`.
pub const BYTE_FALSE: [u8; 1] = [0];

/// Types with a canonical wire encoding.
pub trait Encode {
    fn encode(&self, sink: &mut ZeroCopySink);
}

/// Types that can be read back from their wire encoding.
pub trait Decode: Sized {
    fn decode(source: &mut ZeroCopySource<'_>) -> Result<Self>;
}

/// Encode a value into a fresh buffer.
pub fn encode_to_vec<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut sink = ZeroCopySink::new();
    value.encode(&mut sink);
    sink.into_bytes()
}

/// Decode a value that must consume the whole buffer.
pub fn decode_exact<T: Decode>(bytes: &[u8]) -> Result<T> {
    let mut source = ZeroCopySource::new(bytes);
    let value = T::decode(&mut source)?;
    if source.remaining() != 0 {
        return Err(DecodeError::Malformed("trailing bytes after record"));
    }
    Ok(value)
}

impl Encode for u64 {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_uint(*self);
    }
}

impl Decode for u64 {
    fn decode(source: &mut ZeroCopySource<'_>) -> Result<Self> {
        source.next_var_uint()
    }
}

impl Encode for bool {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_bool(*self);
    }
}

impl Decode for bool {
    fn decode(source: &mut ZeroCopySource<'_>) -> Result<Self> {
        source.next_bool()
    }
}

/// Byte strings are written as var-bytes.
impl Encode for Vec<u8> {
    fn encode(&self, sink: &mut ZeroCopySink) {
        sink.write_var_bytes(self);
    }
}

impl Decode for Vec<u8> {
    fn decode(source: &mut ZeroCopySource<'_>) -> Result<Self> {
        source.next_var_vec()
    }
}
