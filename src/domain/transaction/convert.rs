//! Conversions: transaction wire types → domain types.

use crate::domain::transaction::wire::TransactionResponse;
use crate::domain::transaction::{CommittedTransaction, TransactionStatus};

impl From<TransactionResponse> for CommittedTransaction {
    fn from(w: TransactionResponse) -> Self {
        Self {
            kind: w.kind,
            hash: w.hash,
            success: w.success.unwrap_or(false),
            vm_status: w.vm_status.unwrap_or_default(),
            version: w.version,
            gas_used: w.gas_used,
            sender: w.sender,
            sequence_number: w.sequence_number,
            details: w.extra,
        }
    }
}

impl From<TransactionResponse> for TransactionStatus {
    fn from(w: TransactionResponse) -> Self {
        if w.is_pending() {
            TransactionStatus::Pending { hash: w.hash }
        } else {
            TransactionStatus::Committed(w.into())
        }
    }
}
