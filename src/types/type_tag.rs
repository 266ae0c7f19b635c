//! Move type tags.
//!
//! [`TypeTag`] is a closed union; every `match` over it is exhaustive, so a new
//! variant cannot be added without touching the codec and the renderer.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, ParseError};
use crate::types::address::AccountAddress;
use crate::types::parser;

/// Wire discriminants. Never renumber.
pub mod discriminant {
    pub const BOOL: u32 = 0;
    pub const U8: u32 = 1;
    pub const U64: u32 = 2;
    pub const U128: u32 = 3;
    pub const ADDRESS: u32 = 4;
    pub const SIGNER: u32 = 5;
    pub const VECTOR: u32 = 6;
    pub const STRUCT: u32 = 7;
    pub const U16: u32 = 8;
    pub const U32: u32 = 9;
    pub const U256: u32 = 10;
}

/// The type of a Move value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

impl TypeTag {
    pub fn discriminant(&self) -> u32 {
        match self {
            TypeTag::Bool => discriminant::BOOL,
            TypeTag::U8 => discriminant::U8,
            TypeTag::U16 => discriminant::U16,
            TypeTag::U32 => discriminant::U32,
            TypeTag::U64 => discriminant::U64,
            TypeTag::U128 => discriminant::U128,
            TypeTag::U256 => discriminant::U256,
            TypeTag::Address => discriminant::ADDRESS,
            TypeTag::Signer => discriminant::SIGNER,
            TypeTag::Vector(_) => discriminant::VECTOR,
            TypeTag::Struct(_) => discriminant::STRUCT,
        }
    }

    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn as_struct(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
        }
    }
}

impl FromStr for TypeTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_type_tag(s)
    }
}

impl BcsSerialize for TypeTag {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.uleb128(self.discriminant());
        match self {
            TypeTag::Bool
            | TypeTag::U8
            | TypeTag::U16
            | TypeTag::U32
            | TypeTag::U64
            | TypeTag::U128
            | TypeTag::U256
            | TypeTag::Address
            | TypeTag::Signer => {}
            TypeTag::Vector(inner) => serializer.value(inner.as_ref()),
            TypeTag::Struct(tag) => serializer.value(tag.as_ref()),
        }
    }
}

impl BcsDeserialize for TypeTag {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        let tag = match deserializer.uleb128()? {
            discriminant::BOOL => TypeTag::Bool,
            discriminant::U8 => TypeTag::U8,
            discriminant::U16 => TypeTag::U16,
            discriminant::U32 => TypeTag::U32,
            discriminant::U64 => TypeTag::U64,
            discriminant::U128 => TypeTag::U128,
            discriminant::U256 => TypeTag::U256,
            discriminant::ADDRESS => TypeTag::Address,
            discriminant::SIGNER => TypeTag::Signer,
            discriminant::VECTOR => TypeTag::Vector(deserializer.nested(|de| de.value())?),
            discriminant::STRUCT => TypeTag::Struct(deserializer.nested(|de| de.value())?),
            other => {
                return Err(BcsError::invalid(format!(
                    "unknown type tag discriminant {other}"
                )))
            }
        };
        Ok(tag)
    }
}

impl Serialize for TypeTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        TypeTag::from_str(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// StructTag
// ============================================================================

/// A fully-qualified, possibly generic struct type: `address::module::Name<T, ..>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
            type_args,
        }
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }
}

impl std::fmt::Display for StructTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl FromStr for StructTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parser::parse_type_tag(s)? {
            TypeTag::Struct(tag) => Ok(*tag),
            other => Err(ParseError::InvalidPath(other.to_string())),
        }
    }
}

impl BcsSerialize for StructTag {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.value(&self.address);
        serializer.str(&self.module);
        serializer.str(&self.name);
        serializer.sequence(&self.type_args);
    }
}

impl BcsDeserialize for StructTag {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            address: deserializer.value()?,
            module: deserializer.str()?,
            name: deserializer.str()?,
            type_args: deserializer.sequence()?,
        })
    }
}

// ============================================================================
// ModuleId
// ============================================================================

/// `address::module`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

impl FromStr for ModuleId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (address, name) = trimmed
            .split_once("::")
            .ok_or_else(|| ParseError::InvalidPath(s.to_string()))?;
        if !parser::is_identifier(name) {
            return Err(ParseError::InvalidPath(s.to_string()));
        }
        Ok(Self::new(AccountAddress::from_str(address)?, name))
    }
}

impl BcsSerialize for ModuleId {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.value(&self.address);
        serializer.str(&self.name);
    }
}

impl BcsDeserialize for ModuleId {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            address: deserializer.value()?,
            name: deserializer.str()?,
        })
    }
}
