//! Account wire types: raw serde structs for `GET /accounts/{address}`.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::{u128_string, u64_string};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(with = "u64_string")]
    pub sequence_number: u64,
    pub authentication_key: AuthenticationKeys,
}

/// Nodes report either a single key or the full key set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthenticationKeys {
    Single(String),
    Many(Vec<String>),
}

/// First return value of `0x1::endless_coin::balance`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BalanceValue(#[serde(with = "u128_string")] pub u128);
