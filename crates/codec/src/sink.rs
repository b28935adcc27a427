//! Append-only output buffer.

use crate::Encode;

/// Growable byte buffer records are encoded into.
#[derive(Debug, Default, Clone)]
pub struct ZeroCopySink {
    buf: Vec<u8>,
}

impl ZeroCopySink {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Raw bytes with no length prefix (fixed-width fields).
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Canonical compact unsigned integer.
    ///
    /// `< 0xFD` is a single byte; larger values use a one-byte marker
    /// (`0xFD`, `0xFE`, `0xFF`) followed by a little-endian u16/u32/u64.
    pub fn write_var_uint(&mut self, value: u64) {
        if value < 0xFD {
            self.write_u8(value as u8);
        } else if value <= u64::from(u16::MAX) {
            self.write_u8(0xFD);
            self.write_u16(value as u16);
        } else if value <= u64::from(u32::MAX) {
            self.write_u8(0xFE);
            self.write_u32(value as u32);
        } else {
            self.write_u8(0xFF);
            self.write_u64(value);
        }
    }

    /// Length-prefixed byte string.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_uint(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    /// Encode a nested record as var-bytes so readers can skip it safely.
    pub fn write_nested<T: Encode + ?Sized>(&mut self, value: &T) {
        let mut inner = ZeroCopySink::new();
        value.encode(&mut inner);
        self.write_var_bytes(inner.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_uint_boundaries() {
        let cases: [(u64, Vec<u8>); 6] = [
            (0, vec![0x00]),
            (0xFC, vec![0xFC]),
            (0xFD, vec![0xFD, 0xFD, 0x00]),
            (0xFFFF, vec![0xFD, 0xFF, 0xFF]),
            (0x1_0000, vec![0xFE, 0x00, 0x00, 0x01, 0x00]),
            (
                0x1_0000_0000,
                vec![0xFF, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
            ),
        ];
        for (value, expected) in cases {
            let mut sink = ZeroCopySink::new();
            sink.write_var_uint(value);
            assert_eq!(sink.into_bytes(), expected, "value {value:#x}");
        }
    }

    #[test]
    fn var_bytes_carry_length_prefix() {
        let mut sink = ZeroCopySink::new();
        sink.write_var_bytes(b"abc");
        assert_eq!(sink.as_bytes(), &[3, b'a', b'b', b'c']);
    }
}
