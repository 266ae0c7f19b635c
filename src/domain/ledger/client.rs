//! Ledger sub-client: node info and the cached chain id.

use crate::client::EndlessClient;
use crate::domain::ledger::wire::LedgerInfoResponse;
use crate::domain::ledger::LedgerInfo;
use crate::error::SdkError;
use crate::http::Transport;

/// Sub-client for ledger queries.
pub struct Ledger<'a, T: Transport> {
    pub(crate) client: &'a EndlessClient<T>,
}

impl<'a, T: Transport> Ledger<'a, T> {
    /// `GET /`.
    pub async fn info(&self) -> Result<LedgerInfo, SdkError> {
        let resp = self.client.transport.get("/", &[]).await?.error_for_status()?;
        let wire: LedgerInfoResponse = resp.json()?;
        Ok(wire.into())
    }

    /// Chain id, fetched once and cached for the client's lifetime.
    pub async fn chain_id(&self) -> Result<u8, SdkError> {
        if let Some(chain_id) = *self.client.chain_id.read().await {
            return Ok(chain_id);
        }

        let chain_id = self.info().await?.chain_id;
        *self.client.chain_id.write().await = Some(chain_id);
        tracing::debug!(chain_id, "Cached chain id");
        Ok(chain_id)
    }
}
