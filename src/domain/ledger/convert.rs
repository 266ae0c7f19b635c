//! Conversions: ledger wire types → domain types.

use std::time::Duration;

use crate::domain::ledger::wire::LedgerInfoResponse;
use crate::domain::ledger::LedgerInfo;

impl From<LedgerInfoResponse> for LedgerInfo {
    fn from(w: LedgerInfoResponse) -> Self {
        Self {
            chain_id: w.chain_id,
            epoch: w.epoch,
            ledger_version: w.ledger_version,
            block_height: w.block_height,
            ledger_timestamp: Duration::from_micros(w.ledger_timestamp),
        }
    }
}
