//! Transaction wire types: raw serde structs for `/transactions` responses.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::option_u64_string;

/// `type` of a transaction the node has accepted but not yet committed.
pub const PENDING_TRANSACTION: &str = "pending_transaction";

/// Any transaction record: submission result, by-hash lookup, simulation
/// output or account history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde(default, with = "option_u64_string")]
    pub version: Option<u64>,
    #[serde(default, with = "option_u64_string")]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default, with = "option_u64_string")]
    pub sequence_number: Option<u64>,
    /// Everything else the node returned (payload, events, changes, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TransactionResponse {
    pub fn is_pending(&self) -> bool {
        self.kind == PENDING_TRANSACTION
    }
}
