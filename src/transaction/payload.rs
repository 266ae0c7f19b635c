//! Transaction payloads.

use std::str::FromStr;

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, SdkResult};
use crate::types::{ModuleId, TypeTag};

/// One call argument, encoded at construction.
///
/// Only [`BcsSerialize`] values can become arguments, so an argument that
/// cannot be encoded is rejected by the compiler instead of at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionArgument(Vec<u8>);

impl TransactionArgument {
    pub fn new<T: BcsSerialize + ?Sized>(value: &T) -> Self {
        Self(bcs::to_bytes(value))
    }

    /// Wrap bytes that are already a canonical encoding.
    pub fn from_encoded(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// A call to a public entry function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: String,
    pub ty_args: Vec<TypeTag>,
    /// Pre-encoded arguments; never reinterpreted.
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    pub fn new(
        module: ModuleId,
        function: impl Into<String>,
        ty_args: Vec<TypeTag>,
        args: Vec<TransactionArgument>,
    ) -> Self {
        Self {
            module,
            function: function.into(),
            ty_args,
            args: args.into_iter().map(TransactionArgument::into_bytes).collect(),
        }
    }

    /// Build from a textual module id such as `"0x1::endless_account"`.
    pub fn natural(
        module: &str,
        function: &str,
        ty_args: Vec<TypeTag>,
        args: Vec<TransactionArgument>,
    ) -> SdkResult<Self> {
        Ok(Self::new(ModuleId::from_str(module)?, function, ty_args, args))
    }
}

impl BcsSerialize for EntryFunction {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        self.module.serialize(serializer);
        serializer.str(&self.function);
        serializer.sequence(&self.ty_args);
        serializer.sequence_with(&self.args, |s, arg| s.bytes(arg));
    }
}

impl BcsDeserialize for EntryFunction {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            module: ModuleId::deserialize(deserializer)?,
            function: deserializer.str()?,
            ty_args: deserializer.sequence()?,
            args: deserializer.sequence_with(|d| d.bytes())?,
        })
    }
}

/// What a transaction executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    EntryFunction(EntryFunction),
}

impl TransactionPayload {
    // 0 = script, 1 = module bundle; neither is produced by this SDK.
    pub const ENTRY_FUNCTION: u32 = 2;
}

impl From<EntryFunction> for TransactionPayload {
    fn from(entry: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(entry)
    }
}

impl BcsSerialize for TransactionPayload {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        match self {
            TransactionPayload::EntryFunction(entry) => {
                serializer.uleb128(Self::ENTRY_FUNCTION);
                entry.serialize(serializer);
            }
        }
    }
}

impl BcsDeserialize for TransactionPayload {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        match deserializer.uleb128()? {
            Self::ENTRY_FUNCTION => Ok(TransactionPayload::EntryFunction(
                EntryFunction::deserialize(deserializer)?,
            )),
            other => Err(BcsError::invalid(format!(
                "unsupported payload variant {other}"
            ))),
        }
    }
}
