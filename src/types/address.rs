//! 32-byte account identity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use std::str::FromStr;

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, ParseError};

/// Authentication-key scheme byte for a single ed25519 key.
pub const ED25519_SCHEME: u8 = 0x00;

/// An account address.
///
/// Text form is canonical: special addresses (`0x0` through `0xf`) render
/// short, everything else renders as `0x` followed by 64 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; AccountAddress::LENGTH]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub const ZERO: Self = Self([0u8; Self::LENGTH]);

    pub const ONE: Self = Self::from_u8(1);

    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[Self::LENGTH - 1] = value;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; Self::LENGTH] {
        self.0
    }

    /// `0x0` through `0xf`.
    pub fn is_special(&self) -> bool {
        self.0[..Self::LENGTH - 1].iter().all(|b| *b == 0) && self.0[Self::LENGTH - 1] < 0x10
    }

    /// Always the 64-digit form, regardless of [`is_special`](Self::is_special).
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Address of a fresh account controlled by a single ed25519 key:
    /// `sha3_256(public_key || 0x00)`.
    pub fn from_ed25519_public_key(public_key: &[u8; 32]) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([ED25519_SCHEME]);
        Self(hasher.finalize().into())
    }

    /// Parse requiring the `0x` prefix and the long form, except for special
    /// addresses which may be written short.
    pub fn from_str_strict(s: &str) -> Result<Self, ParseError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ParseError::InvalidAddress(format!("missing 0x prefix: {s}")))?;
        let address = Self::from_str(s)?;
        if digits.len() == Self::LENGTH * 2 || (digits.len() == 1 && address.is_special()) {
            Ok(address)
        } else {
            Err(ParseError::InvalidAddress(format!(
                "expected 64 hex digits or a special address: {s}"
            )))
        }
    }
}

/// Relaxed parse: optional `0x` prefix, 1 to 64 hex digits, zero-padded on
/// the left.
impl FromStr for AccountAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(ParseError::InvalidAddress(s.to_string()));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; Self::LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| ParseError::InvalidAddress(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_special() {
            write!(f, "0x{:x}", self.0[Self::LENGTH - 1])
        } else {
            write!(f, "0x{}", hex::encode(self.0))
        }
    }
}

impl std::fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<[u8; AccountAddress::LENGTH]> for AccountAddress {
    fn from(bytes: [u8; AccountAddress::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl BcsSerialize for AccountAddress {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.fixed_bytes(&self.0);
    }
}

impl BcsDeserialize for AccountAddress {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        deserializer.fixed_array().map(Self)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        AccountAddress::from_str(&s).map_err(serde::de::Error::custom)
    }
}
