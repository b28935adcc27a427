//! Bounds-checked input cursor.

use crate::error::{DecodeError, Result};
use crate::Decode;

/// Reads values out of a borrowed buffer, advancing an internal position.
#[derive(Debug, Clone)]
pub struct ZeroCopySource<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ZeroCopySource<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated);
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn next_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn next_bool(&mut self) -> Result<bool> {
        match self.next_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::Malformed("boolean byte must be 0 or 1")),
        }
    }

    pub fn next_u16(&mut self) -> Result<u16> {
        let bytes = self.next_array::<2>()?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn next_u32(&mut self) -> Result<u32> {
        let bytes = self.next_array::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn next_u64(&mut self) -> Result<u64> {
        let bytes = self.next_array::<8>()?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Fixed-width field such as an address or a hash.
    pub fn next_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Canonical compact unsigned integer; non-minimal forms are rejected.
    pub fn next_var_uint(&mut self) -> Result<u64> {
        match self.next_u8()? {
            0xFD => {
                let value = u64::from(self.next_u16()?);
                if value < 0xFD {
                    return Err(DecodeError::Malformed("non-canonical varuint"));
                }
                Ok(value)
            }
            0xFE => {
                let value = u64::from(self.next_u32()?);
                if value <= u64::from(u16::MAX) {
                    return Err(DecodeError::Malformed("non-canonical varuint"));
                }
                Ok(value)
            }
            0xFF => {
                let value = self.next_u64()?;
                if value <= u64::from(u32::MAX) {
                    return Err(DecodeError::Malformed("non-canonical varuint"));
                }
                Ok(value)
            }
            small => Ok(u64::from(small)),
        }
    }

    /// Length-prefixed byte string borrowed from the input.
    pub fn next_var_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.next_var_uint()?;
        if len > self.remaining() as u64 {
            return Err(DecodeError::Malformed("length prefix exceeds input"));
        }
        self.take(len as usize)
    }

    pub fn next_var_vec(&mut self) -> Result<Vec<u8>> {
        self.next_var_bytes().map(<[u8]>::to_vec)
    }

    /// A record nested as var-bytes; the nested buffer must be consumed exactly.
    pub fn next_nested<T: Decode>(&mut self) -> Result<T> {
        let inner = self.next_var_bytes()?;
        crate::decode_exact(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_canonical_var_uint() {
        let mut source = ZeroCopySource::new(&[0xFD, 0x10, 0x00]);
        assert_eq!(
            source.next_var_uint(),
            Err(DecodeError::Malformed("non-canonical varuint"))
        );

        let mut source = ZeroCopySource::new(&[0xFE, 0xFF, 0xFF, 0x00, 0x00]);
        assert!(matches!(
            source.next_var_uint(),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn underrun_inside_prefix_is_truncated() {
        let mut source = ZeroCopySource::new(&[0xFD, 0x01]);
        assert_eq!(source.next_var_uint(), Err(DecodeError::Truncated));

        let mut source = ZeroCopySource::new(&[]);
        assert_eq!(source.next_var_bytes(), Err(DecodeError::Truncated));
    }

    #[test]
    fn oversized_length_is_malformed() {
        let mut source = ZeroCopySource::new(&[5, 1, 2]);
        assert_eq!(
            source.next_var_bytes(),
            Err(DecodeError::Malformed("length prefix exceeds input"))
        );
    }

    #[test]
    fn bool_must_be_zero_or_one() {
        let mut source = ZeroCopySource::new(&[0, 1, 2]);
        assert_eq!(source.next_bool(), Ok(false));
        assert_eq!(source.next_bool(), Ok(true));
        assert!(matches!(source.next_bool(), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn fixed_readers_are_little_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0, 0, 0, 0, 0, 0, 0];
        let mut source = ZeroCopySource::new(&bytes);
        assert_eq!(source.next_u32(), Ok(0x0403_0201));
        assert_eq!(source.next_u64(), Ok(5));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next_u8(), Err(DecodeError::Truncated));
    }
}
