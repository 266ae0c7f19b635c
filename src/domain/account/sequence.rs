//! Per-sender sequence-number source.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_lock::Mutex;

use crate::error::{SdkError, SdkResult};
use crate::types::AccountAddress;

type Slot = Arc<Mutex<Option<u64>>>;

/// Hands out strictly increasing sequence numbers per sender.
///
/// The first acquisition for an address reads the node; later ones count up
/// locally. Acquisitions for one address are serialized on that address's
/// lock, including the initial read; different addresses never contend.
#[derive(Debug, Clone, Default)]
pub struct SequenceNumberTracker {
    slots: Arc<Mutex<HashMap<AccountAddress, Slot>>>,
}

impl SequenceNumberTracker {
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, address: AccountAddress) -> Slot {
        self.slots
            .lock()
            .await
            .entry(address)
            .or_default()
            .clone()
    }

    /// Next sequence number for `address`. `fetch` reads the on-chain value
    /// and is called only when nothing is cached.
    pub async fn next<F, Fut>(&self, address: AccountAddress, fetch: F) -> SdkResult<u64>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SdkResult<u64>>,
    {
        let slot = self.slot(address).await;
        let mut cached = slot.lock().await;

        let next = match *cached {
            Some(next) => next,
            None => {
                let on_chain = fetch().await?;
                tracing::debug!(%address, sequence_number = on_chain, "Loaded sequence number");
                on_chain
            }
        };
        let following = next
            .checked_add(1)
            .ok_or_else(|| SdkError::Other(format!("sequence number overflow for {address}")))?;
        *cached = Some(following);
        Ok(next)
    }

    /// Value the next acquisition would return, if cached.
    pub async fn peek(&self, address: AccountAddress) -> Option<u64> {
        let slot = self.slots.lock().await.get(&address).cloned()?;
        let cached = *slot.lock().await;
        cached
    }

    /// Forget the cached value so the next acquisition re-reads the node.
    pub async fn resync(&self, address: AccountAddress) {
        if let Some(slot) = self.slots.lock().await.get(&address).cloned() {
            *slot.lock().await = None;
            tracing::info!(%address, "Sequence number resync scheduled");
        }
    }

    /// Forget every cached value.
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}
