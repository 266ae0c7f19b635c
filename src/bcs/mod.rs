//! Binary Canonical Serialization.
//!
//! Every value has exactly one valid encoding:
//!
//! - fixed-width integers are little-endian, `bool` is `0x00` / `0x01`
//! - lengths and enum discriminants are ULEB128 (`u32` range, minimal form)
//! - byte strings, UTF-8 strings and sequences carry a ULEB128 length prefix
//! - `Option<T>` is a `0x00` / `0x01` tag followed by `T` only when present
//!
//! Types opt in through [`BcsSerialize`] / [`BcsDeserialize`]. Anything that
//! ends up in a transaction argument slot must implement [`BcsSerialize`], so
//! a non-encodable argument is a compile error rather than an encode-time one.

mod de;
mod option;
mod ser;

pub use de::Deserializer;
pub use ser::Serializer;

use crate::error::BcsError;

/// Largest length prefix accepted for any byte string or sequence.
pub const MAX_SEQUENCE_LENGTH: usize = (1 << 31) - 1;

/// Deepest nesting of recursive values (type tags) accepted when decoding or
/// parsing.
pub const MAX_NESTING_DEPTH: usize = 128;

/// A value that can be written with the canonical codec.
pub trait BcsSerialize {
    fn serialize(&self, serializer: &mut Serializer);
}

/// A value that can be read back from its canonical encoding.
pub trait BcsDeserialize: Sized {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError>;
}

/// Encode a value.
pub fn to_bytes<T: BcsSerialize + ?Sized>(value: &T) -> Vec<u8> {
    let mut serializer = Serializer::new();
    value.serialize(&mut serializer);
    serializer.into_bytes()
}

/// Decode a value that must span the whole input.
pub fn from_bytes<T: BcsDeserialize>(bytes: &[u8]) -> Result<T, BcsError> {
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.finish()?;
    Ok(value)
}

/// Decode a value from the front of `bytes`, returning it with the number of
/// bytes consumed.
pub fn from_bytes_prefix<T: BcsDeserialize>(bytes: &[u8]) -> Result<(T, usize), BcsError> {
    let mut deserializer = Deserializer::new(bytes);
    let value = T::deserialize(&mut deserializer)?;
    Ok((value, deserializer.position()))
}

// ============================================================================
// Primitive impls
// ============================================================================

macro_rules! impl_bcs_int {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl BcsSerialize for $ty {
                fn serialize(&self, serializer: &mut Serializer) {
                    serializer.$method(*self);
                }
            }

            impl BcsDeserialize for $ty {
                fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError> {
                    deserializer.$method()
                }
            }
        )*
    };
}

impl_bcs_int! {
    bool => bool,
    u8 => u8,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    u128 => u128,
}

impl BcsSerialize for str {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.str(self);
    }
}

impl BcsSerialize for String {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.str(self);
    }
}

impl BcsDeserialize for String {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError> {
        deserializer.str()
    }
}

impl<T: BcsSerialize> BcsSerialize for [T] {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.sequence(self);
    }
}

impl<T: BcsSerialize> BcsSerialize for Vec<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.sequence(self);
    }
}

impl<T: BcsDeserialize> BcsDeserialize for Vec<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError> {
        deserializer.sequence()
    }
}

impl<T: BcsSerialize + ?Sized> BcsSerialize for &T {
    fn serialize(&self, serializer: &mut Serializer) {
        (**self).serialize(serializer);
    }
}

impl<T: BcsSerialize + ?Sized> BcsSerialize for Box<T> {
    fn serialize(&self, serializer: &mut Serializer) {
        (**self).serialize(serializer);
    }
}

impl<T: BcsDeserialize> BcsDeserialize for Box<T> {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> Result<Self, BcsError> {
        T::deserialize(deserializer).map(Box::new)
    }
}
