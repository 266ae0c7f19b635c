use super::{BcsDeserialize, MAX_NESTING_DEPTH, MAX_SEQUENCE_LENGTH};
use crate::error::BcsError;

/// Cursor over a canonical encoding.
///
/// Every read either consumes exactly the bytes of one value or fails without
/// producing a partial value.
#[derive(Debug, Clone)]
pub struct Deserializer<'a> {
    input: &'a [u8],
    position: usize,
    depth: usize,
}

macro_rules! read_le {
    ($($method:ident -> $ty:ty),* $(,)?) => {
        $(
            pub fn $method(&mut self) -> Result<$ty, BcsError> {
                const LEN: usize = std::mem::size_of::<$ty>();
                let bytes = self.fixed_bytes(LEN)?;
                let mut buf = [0u8; LEN];
                buf.copy_from_slice(bytes);
                Ok(<$ty>::from_le_bytes(buf))
            }
        )*
    };
}

impl<'a> Deserializer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            depth: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail if any input is left unread.
    pub fn finish(&self) -> Result<(), BcsError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(BcsError::invalid(format!(
                "{} trailing bytes after value",
                self.remaining()
            )))
        }
    }

    /// Take `len` raw bytes.
    pub fn fixed_bytes(&mut self, len: usize) -> Result<&'a [u8], BcsError> {
        if len > self.remaining() {
            return Err(BcsError::TruncatedInput {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let start = self.position;
        self.position += len;
        Ok(&self.input[start..self.position])
    }

    pub fn fixed_array<const N: usize>(&mut self) -> Result<[u8; N], BcsError> {
        let bytes = self.fixed_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn bool(&mut self) -> Result<bool, BcsError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::invalid(format!("bool byte {other:#04x}"))),
        }
    }

    pub fn u8(&mut self) -> Result<u8, BcsError> {
        Ok(self.fixed_bytes(1)?[0])
    }

    read_le! {
        u16 -> u16,
        u32 -> u32,
        u64 -> u64,
        u128 -> u128,
    }

    /// Read a ULEB128 integer into the `u32` range.
    ///
    /// Rejects a continuation bit on the final available byte, values wider
    /// than 32 bits, and non-minimal encodings (redundant trailing zero groups).
    pub fn uleb128(&mut self) -> Result<u32, BcsError> {
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = match self.input.get(self.position) {
                Some(b) => *b,
                None if shift == 0 => {
                    return Err(BcsError::TruncatedInput {
                        needed: 1,
                        remaining: 0,
                    })
                }
                None => {
                    return Err(BcsError::invalid(
                        "ULEB128 continuation bit set on final byte",
                    ))
                }
            };
            self.position += 1;

            let digit = (byte & 0x7f) as u64;
            value |= digit << shift;
            if value > u32::MAX as u64 {
                return Err(BcsError::invalid("ULEB128 value overflows u32"));
            }

            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(BcsError::invalid("non-canonical ULEB128 encoding"));
                }
                return Ok(value as u32);
            }

            shift += 7;
            if shift > 28 {
                return Err(BcsError::invalid("ULEB128 value overflows u32"));
            }
        }
    }

    /// Read a length prefix.
    pub fn length(&mut self) -> Result<usize, BcsError> {
        let len = self.uleb128()? as usize;
        if len > MAX_SEQUENCE_LENGTH {
            return Err(BcsError::invalid(format!(
                "length {len} exceeds maximum {MAX_SEQUENCE_LENGTH}"
            )));
        }
        Ok(len)
    }

    /// Length-prefixed byte string.
    pub fn bytes(&mut self) -> Result<Vec<u8>, BcsError> {
        let len = self.length()?;
        Ok(self.fixed_bytes(len)?.to_vec())
    }

    pub fn str(&mut self) -> Result<String, BcsError> {
        let raw = self.bytes()?;
        String::from_utf8(raw).map_err(|e| BcsError::invalid(format!("invalid UTF-8: {e}")))
    }

    pub fn value<T: BcsDeserialize>(&mut self) -> Result<T, BcsError> {
        T::deserialize(self)
    }

    pub fn sequence<T: BcsDeserialize>(&mut self) -> Result<Vec<T>, BcsError> {
        self.sequence_with(T::deserialize)
    }

    /// Decode a value one nesting level down. Recursive types go through
    /// here; past [`MAX_NESTING_DEPTH`] levels this is `InvalidEncoding`.
    pub fn nested<T>(
        &mut self,
        decode: impl FnOnce(&mut Self) -> Result<T, BcsError>,
    ) -> Result<T, BcsError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(BcsError::invalid(format!(
                "nesting deeper than {MAX_NESTING_DEPTH} levels"
            )));
        }
        self.depth += 1;
        let result = decode(self);
        self.depth -= 1;
        result
    }

    /// Length-prefixed sequence with a caller-supplied element decoder.
    pub fn sequence_with<T>(
        &mut self,
        mut decode: impl FnMut(&mut Self) -> Result<T, BcsError>,
    ) -> Result<Vec<T>, BcsError> {
        let len = self.length()?;
        // Each element takes at least one byte; never trust the prefix for capacity.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(decode(self)?);
        }
        Ok(items)
    }
}
