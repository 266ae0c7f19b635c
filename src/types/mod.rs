//! On-chain value types: addresses, wide integers and Move type tags.

pub mod address;
mod parser;
pub mod type_tag;
pub mod u256;

pub use address::AccountAddress;
pub use type_tag::{ModuleId, StructTag, TypeTag};
pub use u256::U256;
