use super::{BcsSerialize, MAX_SEQUENCE_LENGTH};

/// Append-only writer for canonical encodings.
#[derive(Debug, Default, Clone)]
pub struct Serializer {
    output: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    pub fn bool(&mut self, value: bool) {
        self.output.push(value as u8);
    }

    pub fn u8(&mut self, value: u8) {
        self.output.push(value);
    }

    pub fn u16(&mut self, value: u16) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u64(&mut self, value: u64) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u128(&mut self, value: u128) {
        self.output.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a ULEB128 integer: 7 bits per byte, low group first, high bit set
    /// on every byte except the last.
    pub fn uleb128(&mut self, value: u32) {
        let mut value = value;
        while value >= 0x80 {
            self.output.push((value & 0x7f) as u8 | 0x80);
            value >>= 7;
        }
        self.output.push(value as u8);
    }

    /// Write a length prefix.
    ///
    /// Panics if `len` exceeds [`MAX_SEQUENCE_LENGTH`]; no in-memory value the
    /// SDK builds comes close.
    pub fn length(&mut self, len: usize) {
        assert!(
            len <= MAX_SEQUENCE_LENGTH,
            "sequence length {len} exceeds BCS maximum"
        );
        self.uleb128(len as u32);
    }

    /// Raw bytes with no length prefix (addresses, pre-encoded values).
    pub fn fixed_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    /// Length-prefixed byte string.
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.length(bytes.len());
        self.fixed_bytes(bytes);
    }

    pub fn str(&mut self, value: &str) {
        self.bytes(value.as_bytes());
    }

    pub fn value<T: BcsSerialize + ?Sized>(&mut self, value: &T) {
        value.serialize(self);
    }

    /// Length-prefixed sequence of homogeneous values.
    pub fn sequence<T: BcsSerialize>(&mut self, items: &[T]) {
        self.sequence_with(items, |s, item| item.serialize(s));
    }

    /// Length-prefixed sequence with a caller-supplied element encoder.
    pub fn sequence_with<T>(&mut self, items: &[T], mut encode: impl FnMut(&mut Self, &T)) {
        self.length(items.len());
        for item in items {
            encode(self, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uleb(value: u32) -> Vec<u8> {
        let mut s = Serializer::new();
        s.uleb128(value);
        s.into_bytes()
    }

    #[test]
    fn test_uleb128_boundaries() {
        assert_eq!(uleb(0), vec![0x00]);
        assert_eq!(uleb(0x7f), vec![0x7f]);
        assert_eq!(uleb(0x80), vec![0x80, 0x01]);
        assert_eq!(uleb(300), vec![0xac, 0x02]);
        assert_eq!(uleb(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(uleb(u32::MAX), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_sequence_with_custom_encoder() {
        let mut s = Serializer::new();
        s.sequence_with(&[1u64, 2], |s, v| s.u8(*v as u8));
        assert_eq!(s.as_bytes(), &[2, 1, 2]);
    }

    #[test]
    fn test_long_byte_string_prefix() {
        let mut s = Serializer::new();
        s.bytes(&[7u8; 200]);
        let out = s.into_bytes();
        assert_eq!(&out[..2], &[0xc8, 0x01]);
        assert_eq!(out.len(), 202);
    }
}
