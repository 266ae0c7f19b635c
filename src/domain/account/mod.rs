//! Account domain: on-chain account state and sequence numbers.

pub mod client;
pub mod convert;
pub mod sequence;
pub mod wire;

pub use sequence::SequenceNumberTracker;

/// On-chain state of an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// Next sequence number the account will accept.
    pub sequence_number: u64,
    pub authentication_keys: Vec<String>,
}
