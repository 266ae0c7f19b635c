//! Ledger domain: chain identity and head of the ledger.

pub mod client;
pub mod convert;
pub mod wire;

use std::time::Duration;

/// Snapshot of the node's view of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub epoch: u64,
    pub ledger_version: u64,
    pub block_height: u64,
    /// Since the unix epoch.
    pub ledger_timestamp: Duration,
}

#[cfg(test)]
mod tests {
    use super::wire::LedgerInfoResponse;
    use super::*;

    #[test]
    fn test_ledger_info_from_node_json() {
        let json = r#"{
            "chain_id": 4,
            "epoch": "12",
            "ledger_version": "123456",
            "oldest_ledger_version": "0",
            "ledger_timestamp": "1700000000123456",
            "node_role": "full_node",
            "oldest_block_height": "0",
            "block_height": "5000",
            "git_hash": "abc"
        }"#;
        let wire: LedgerInfoResponse = serde_json::from_str(json).unwrap();
        let info = LedgerInfo::from(wire);
        assert_eq!(info.chain_id, 4);
        assert_eq!(info.ledger_version, 123_456);
        assert_eq!(info.ledger_timestamp.as_secs(), 1_700_000_000);
    }
}
