//! Utilities shared by the domain wire types.

pub mod serde_util;
