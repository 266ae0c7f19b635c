//! Accounts sub-client: account state and sequence numbers.

use crate::client::EndlessClient;
use crate::domain::account::wire::{AccountResponse, BalanceValue};
use crate::domain::account::AccountInfo;
use crate::domain::transaction::wire::TransactionResponse;
use crate::domain::transaction::TransactionStatus;
use crate::error::SdkError;
use crate::http::Transport;
use crate::transaction::{EntryFunction, TransactionArgument};
use crate::types::AccountAddress;

/// Sub-client for account queries.
pub struct Accounts<'a, T: Transport> {
    pub(crate) client: &'a EndlessClient<T>,
}

impl<'a, T: Transport> Accounts<'a, T> {
    /// `GET /accounts/{address}`.
    pub async fn info(&self, address: AccountAddress) -> Result<AccountInfo, SdkError> {
        let path = format!("/accounts/{}", address);
        let resp = self.client.transport.get(&path, &[]).await?.error_for_status()?;
        let wire: AccountResponse = resp.json()?;
        Ok(wire.into())
    }

    /// On-chain sequence number; `0` for an account the chain has not seen.
    pub async fn sequence_number(&self, address: AccountAddress) -> Result<u64, SdkError> {
        let path = format!("/accounts/{}", address);
        let resp = self.client.transport.get(&path, &[]).await?;
        if resp.is_not_found() {
            tracing::debug!(%address, "Account not found, sequence number 0");
            return Ok(0);
        }
        let wire: AccountResponse = resp.error_for_status()?.json()?;
        Ok(wire.sequence_number)
    }

    /// Endless coin balance, read through `0x1::endless_coin::balance`.
    pub async fn balance(
        &self,
        address: AccountAddress,
        ledger_version: Option<u64>,
    ) -> Result<u128, SdkError> {
        let function = EntryFunction::natural(
            "0x1::endless_coin",
            "balance",
            vec![],
            vec![TransactionArgument::new(&address)],
        )?;
        let values = self.client.view().bcs_payload(&function, ledger_version).await?;
        let first = values
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::Other(format!("balance view returned nothing for {address}")))?;
        let BalanceValue(balance) = serde_json::from_value(first)?;
        Ok(balance)
    }

    /// Next sequence number to use for a new transaction from `address`.
    ///
    /// Served from the client's tracker; the node is read only on first use
    /// or after [`resync_sequence_number`](Self::resync_sequence_number).
    pub async fn next_sequence_number(&self, address: AccountAddress) -> Result<u64, SdkError> {
        self.client
            .sequence_numbers
            .next(address, || self.sequence_number(address))
            .await
    }

    pub async fn resync_sequence_number(&self, address: AccountAddress) {
        self.client.sequence_numbers.resync(address).await;
    }

    /// `GET /accounts/{address}/transactions`.
    pub async fn transactions(
        &self,
        address: AccountAddress,
        start: Option<u64>,
        limit: Option<u32>,
    ) -> Result<Vec<TransactionStatus>, SdkError> {
        let path = format!("/accounts/{}/transactions", address);
        let mut params = Vec::new();
        if let Some(s) = start {
            params.push(("start", s.to_string()));
        }
        if let Some(l) = limit {
            params.push(("limit", l.to_string()));
        }
        let resp = self
            .client
            .transport
            .get(&path, &params)
            .await?
            .error_for_status()?;
        let wire: Vec<TransactionResponse> = resp.json()?;
        Ok(wire.into_iter().map(TransactionStatus::from).collect())
    }
}
