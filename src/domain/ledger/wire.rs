//! Ledger wire types: raw serde structs for `GET /`.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::{option_u64_string, u64_string};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfoResponse {
    pub chain_id: u8,
    #[serde(with = "u64_string")]
    pub epoch: u64,
    #[serde(with = "u64_string")]
    pub ledger_version: u64,
    #[serde(default, with = "option_u64_string")]
    pub oldest_ledger_version: Option<u64>,
    /// Microseconds since the unix epoch.
    #[serde(with = "u64_string")]
    pub ledger_timestamp: u64,
    #[serde(with = "u64_string")]
    pub block_height: u64,
    #[serde(default)]
    pub node_role: Option<String>,
}
