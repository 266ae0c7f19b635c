//! Transaction domain: submission results and confirmation status.

pub mod client;
pub mod convert;
pub mod wire;

/// A transaction the node has executed (or, for simulation, would execute).
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedTransaction {
    /// Record type, e.g. `user_transaction`.
    pub kind: String,
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub version: Option<u64>,
    pub gas_used: Option<u64>,
    pub sender: Option<String>,
    pub sequence_number: Option<u64>,
    /// Remaining fields of the node's record.
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionStatus {
    /// Accepted or not yet indexed.
    Pending { hash: String },
    Committed(CommittedTransaction),
}

impl TransactionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStatus::Pending { .. })
    }
}
