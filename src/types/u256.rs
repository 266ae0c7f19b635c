//! 256-bit unsigned integer, stored little-endian.

use std::str::FromStr;

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, ParseError};

/// Largest power of ten below 2^64; decimal output is produced in chunks of
/// this many digits.
const DECIMAL_CHUNK: u64 = 10_000_000_000_000_000_000;
const DECIMAL_CHUNK_DIGITS: usize = 19;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: Self = Self([0u8; 32]);
    pub const MAX: Self = Self([0xff; 32]);

    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_le_bytes(self) -> [u8; 32] {
        self.0
    }

    /// The value if it fits in 128 bits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[16..].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&self.0[..16]);
        Some(u128::from_le_bytes(low))
    }

    fn limbs(&self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(self.0.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        limbs
    }

    fn from_limbs(limbs: [u64; 4]) -> Self {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(limbs) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
        Self(bytes)
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl std::fmt::Debug for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut be = self.0;
        be.reverse();
        write!(f, "U256(0x{})", hex::encode(be))
    }
}

/// Decimal digits only; no sign, prefix or separators.
impl FromStr for U256 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidNumber(s.to_string());
        if s.is_empty() {
            return Err(invalid());
        }

        let mut limbs = [0u64; 4];
        for ch in s.chars() {
            let mut carry = u128::from(ch.to_digit(10).ok_or_else(invalid)?);
            for limb in limbs.iter_mut() {
                let wide = u128::from(*limb) * 10 + carry;
                *limb = wide as u64;
                carry = wide >> 64;
            }
            if carry != 0 {
                return Err(invalid());
            }
        }
        Ok(Self::from_limbs(limbs))
    }
}

/// Decimal.
impl std::fmt::Display for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut limbs = self.limbs();
        let mut chunks = Vec::new();
        while limbs.iter().any(|limb| *limb != 0) {
            let mut rem = 0u128;
            for limb in limbs.iter_mut().rev() {
                let wide = (rem << 64) | u128::from(*limb);
                *limb = (wide / u128::from(DECIMAL_CHUNK)) as u64;
                rem = wide % u128::from(DECIMAL_CHUNK);
            }
            chunks.push(rem as u64);
        }

        let Some(top) = chunks.pop() else {
            return f.pad("0");
        };
        let mut digits = top.to_string();
        for chunk in chunks.iter().rev() {
            digits.push_str(&format!("{chunk:0width$}", width = DECIMAL_CHUNK_DIGITS));
        }
        f.pad(&digits)
    }
}

impl BcsSerialize for U256 {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.fixed_bytes(&self.0);
    }
}

impl BcsDeserialize for U256 {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        deserializer.fixed_array().map(Self)
    }
}
