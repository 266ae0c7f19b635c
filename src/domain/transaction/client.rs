//! Transactions sub-client: build, submit, simulate and confirm.

use futures_util::future::{self, Either};
use futures_util::pin_mut;
use futures_timer::Delay;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::auth::TransactionSigner;
use crate::client::EndlessClient;
use crate::domain::transaction::wire::TransactionResponse;
use crate::domain::transaction::{CommittedTransaction, TransactionStatus};
use crate::error::{HttpError, SdkError, SdkResult};
use crate::http::{HttpResponse, Transport};
use crate::network::SIGNED_TRANSACTION_CONTENT_TYPE;
use crate::transaction::builder::unix_now;
use crate::transaction::{
    AccountAuthenticator, EntryFunction, Ed25519PublicKey, RawTransaction, SignedTransaction,
    SigningSession, TransactionArgument, TransactionAuthenticator, TransactionPayload,
    TransactionVariant,
};
use crate::types::{AccountAddress, StructTag, TypeTag};

/// Number of polls that fit in `wait` at one poll per `interval`.
pub(crate) fn poll_budget(wait: Duration, interval: Duration) -> u32 {
    if interval.is_zero() {
        return 1;
    }
    let polls = wait.as_nanos().div_ceil(interval.as_nanos());
    u32::try_from(polls).unwrap_or(u32::MAX).max(1)
}

/// Sub-client for transaction operations.
pub struct Transactions<'a, T: Transport> {
    pub(crate) client: &'a EndlessClient<T>,
}

impl<'a, T: Transport> Transactions<'a, T> {
    // ── Construction ─────────────────────────────────────────────────────

    /// Raw transaction with the next sequence number, the configured gas
    /// settings, expiration `now + expiration_ttl` and the node's chain id.
    ///
    /// Consumes a sequence number. Use
    /// [`create_transaction_for_simulation`](Self::create_transaction_for_simulation)
    /// for transactions that will never be submitted.
    pub async fn create_transaction(
        &self,
        sender: AccountAddress,
        payload: impl Into<TransactionPayload>,
    ) -> Result<RawTransaction, SdkError> {
        let expiration = self.expiration()?;
        let chain_id = self.client.ledger().chain_id().await?;
        let sequence_number = self.client.accounts().next_sequence_number(sender).await?;
        Ok(self.raw_transaction(sender, sequence_number, chain_id, expiration, payload.into()))
    }

    /// Like [`create_transaction`](Self::create_transaction) but leaves the
    /// sequence-number tracker untouched. The sequence number is the
    /// tracker's pending value when it has one, else the on-chain value.
    pub async fn create_transaction_for_simulation(
        &self,
        sender: AccountAddress,
        payload: impl Into<TransactionPayload>,
    ) -> Result<RawTransaction, SdkError> {
        let expiration = self.expiration()?;
        let chain_id = self.client.ledger().chain_id().await?;
        let sequence_number = match self.client.sequence_numbers.peek(sender).await {
            Some(pending) => pending,
            None => self.client.accounts().sequence_number(sender).await?,
        };
        Ok(self.raw_transaction(sender, sequence_number, chain_id, expiration, payload.into()))
    }

    pub async fn create_signed_transaction(
        &self,
        signer: &impl TransactionSigner,
        payload: impl Into<TransactionPayload>,
    ) -> Result<SignedTransaction, SdkError> {
        let raw = self.create_transaction(signer.address(), payload).await?;
        let sender = raw.sender;
        self.release_on_error(sender, sign_single(raw, signer)).await
    }

    /// Build and fully sign a multi-agent transaction. Secondary signers are
    /// declared in the order given.
    pub async fn create_multi_agent_transaction(
        &self,
        sender: &impl TransactionSigner,
        secondary: &[&dyn TransactionSigner],
        payload: impl Into<TransactionPayload>,
    ) -> Result<SignedTransaction, SdkError> {
        let raw = self.create_transaction(sender.address(), payload).await?;
        let address = raw.sender;
        self.release_on_error(address, sign_multi_agent(raw, sender, secondary))
            .await
    }

    /// Build and fully sign a sponsored transaction. The fee payer signs last.
    pub async fn create_fee_payer_transaction(
        &self,
        sender: &impl TransactionSigner,
        secondary: &[&dyn TransactionSigner],
        fee_payer: &impl TransactionSigner,
        payload: impl Into<TransactionPayload>,
    ) -> Result<SignedTransaction, SdkError> {
        let raw = self.create_transaction(sender.address(), payload).await?;
        let address = raw.sender;
        self.release_on_error(address, sign_fee_payer(raw, sender, secondary, fee_payer))
            .await
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// `POST /transactions` with the BCS body. Returns the node's hash.
    ///
    /// A 4xx reply is [`SdkError::Rejected`]. Any failure, including a
    /// transport error, schedules a sequence-number resync for the sender.
    pub async fn submit(&self, signed: &SignedTransaction) -> Result<String, SdkError> {
        let sender = signed.raw_txn().sender;
        let sent = self
            .client
            .transport
            .post(
                "/transactions",
                &[],
                signed.bytes(),
                SIGNED_TRANSACTION_CONTENT_TYPE,
            )
            .await;

        let resp = match sent.map_err(SdkError::from).and_then(reject_client_errors) {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(
                    %sender,
                    sequence_number = signed.raw_txn().sequence_number,
                    error = %e,
                    "Transaction not accepted"
                );
                self.client.sequence_numbers.resync(sender).await;
                return Err(e);
            }
        };

        let pending: TransactionResponse = resp.json()?;
        let local_hash = signed.hash_hex();
        if !pending.hash.eq_ignore_ascii_case(&local_hash) {
            tracing::warn!(
                node_hash = %pending.hash,
                local_hash = %local_hash,
                "Node hash differs from locally computed hash"
            );
        }
        tracing::info!(
            hash = %pending.hash,
            %sender,
            sequence_number = signed.raw_txn().sequence_number,
            "Transaction submitted"
        );
        Ok(pending.hash)
    }

    /// `POST /transactions/simulate`. The transaction should carry
    /// zero-signature authenticators; see
    /// [`AccountAuthenticator::for_simulation`].
    pub async fn simulate(
        &self,
        signed: &SignedTransaction,
        estimate_gas: bool,
    ) -> Result<Vec<CommittedTransaction>, SdkError> {
        let params: Vec<(&str, String)> = if estimate_gas {
            vec![
                ("estimate_gas_unit_price", "true".to_string()),
                ("estimate_max_gas_amount", "true".to_string()),
            ]
        } else {
            Vec::new()
        };
        let resp = self
            .client
            .transport
            .post(
                "/transactions/simulate",
                &params,
                signed.bytes(),
                SIGNED_TRANSACTION_CONTENT_TYPE,
            )
            .await?;
        let wire: Vec<TransactionResponse> = reject_client_errors(resp)?.json()?;
        Ok(wire.into_iter().map(CommittedTransaction::from).collect())
    }

    /// Simulate a single-sender transaction knowing only the sender's key.
    /// Pair with [`create_transaction_for_simulation`](Self::create_transaction_for_simulation).
    pub async fn simulate_raw(
        &self,
        raw: RawTransaction,
        public_key: Ed25519PublicKey,
        estimate_gas: bool,
    ) -> Result<Vec<CommittedTransaction>, SdkError> {
        let signed = SignedTransaction::new(
            raw,
            TransactionAuthenticator::single(AccountAuthenticator::for_simulation(public_key)),
        );
        self.simulate(&signed, estimate_gas).await
    }

    // ── Status ───────────────────────────────────────────────────────────

    /// `GET /transactions/by_hash/{hash}`. Not found is an error here.
    pub async fn by_hash(&self, hash: &str) -> Result<TransactionStatus, SdkError> {
        let path = format!("/transactions/by_hash/{}", hash);
        let resp = self.client.transport.get(&path, &[]).await?.error_for_status()?;
        let wire: TransactionResponse = resp.json()?;
        Ok(wire.into())
    }

    /// `GET /transactions/by_version/{version}`.
    pub async fn by_version(&self, version: u64) -> Result<TransactionStatus, SdkError> {
        let path = format!("/transactions/by_version/{}", version);
        let resp = self.client.transport.get(&path, &[]).await?.error_for_status()?;
        let wire: TransactionResponse = resp.json()?;
        Ok(wire.into())
    }

    /// Like [`by_hash`](Self::by_hash) but a hash the node does not know
    /// yet is reported as pending.
    pub async fn status(&self, hash: &str) -> Result<TransactionStatus, SdkError> {
        let path = format!("/transactions/by_hash/{}", hash);
        let resp = self.client.transport.get(&path, &[]).await?;
        if resp.is_not_found() {
            return Ok(TransactionStatus::Pending {
                hash: hash.to_string(),
            });
        }
        let wire: TransactionResponse = resp.error_for_status()?.json()?;
        Ok(wire.into())
    }

    pub async fn is_pending(&self, hash: &str) -> Result<bool, SdkError> {
        Ok(self.status(hash).await?.is_pending())
    }

    /// Poll until `hash` leaves the pending state.
    ///
    /// Makes at most `ceil(transaction_wait / poll_interval)` polls, sleeping
    /// `poll_interval` between them. The whole wait is bounded by
    /// `transaction_wait` of wall-clock time: each poll gets at most
    /// `request_timeout` and never more than the time left, and a poll that
    /// gets no answer in time counts as pending. Fails with
    /// [`SdkError::Timeout`] once the polls or the time run out. No lock is
    /// held while waiting.
    pub async fn wait_for_transaction(&self, hash: &str) -> Result<CommittedTransaction, SdkError> {
        let config = &self.client.config;
        let max_attempts = poll_budget(config.transaction_wait, config.poll_interval);
        let deadline = Instant::now() + config.transaction_wait;
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            let bound = config
                .request_timeout
                .min(deadline.saturating_duration_since(Instant::now()));

            match self.poll_once(hash, bound).await? {
                Some(TransactionStatus::Committed(txn)) => {
                    if txn.success {
                        tracing::info!(hash, version = txn.version, attempts, "Transaction committed");
                        return Ok(txn);
                    }
                    tracing::warn!(hash, vm_status = %txn.vm_status, "Transaction failed");
                    return Err(SdkError::ExecutionFailed {
                        hash: txn.hash,
                        vm_status: txn.vm_status,
                    });
                }
                Some(TransactionStatus::Pending { .. }) => {
                    tracing::debug!(hash, attempts, max = max_attempts, "Transaction pending");
                }
                None => {
                    tracing::warn!(hash, attempts, "Status poll timed out");
                }
            }

            let left = deadline.saturating_duration_since(Instant::now());
            if attempts == max_attempts || left.is_zero() {
                break;
            }
            Delay::new(config.poll_interval.min(left)).await;
        }

        tracing::warn!(hash, attempts, "Transaction not confirmed in time");
        Err(SdkError::Timeout {
            hash: hash.to_string(),
            attempts,
        })
    }

    /// Submit, then wait for the committed record.
    pub async fn submit_and_wait(
        &self,
        signed: &SignedTransaction,
    ) -> Result<CommittedTransaction, SdkError> {
        let hash = self.submit(signed).await?;
        self.wait_for_transaction(&hash).await
    }

    // ── Wrappers ─────────────────────────────────────────────────────────

    /// `0x1::endless_account::transfer(to, amount)`. Returns the hash.
    pub async fn transfer(
        &self,
        sender: &impl TransactionSigner,
        to: AccountAddress,
        amount: u128,
    ) -> Result<String, SdkError> {
        let payload = EntryFunction::natural(
            "0x1::endless_account",
            "transfer",
            vec![],
            vec![TransactionArgument::new(&to), TransactionArgument::new(&amount)],
        )?;
        let signed = self.create_signed_transaction(sender, payload).await?;
        self.submit(&signed).await
    }

    /// `0x1::endless_account::transfer_coins<coin_type>(to, amount)` for a
    /// coin type such as `"0x1::endless_coin::EndlessCoin"`. Returns the hash.
    pub async fn transfer_coins(
        &self,
        sender: &impl TransactionSigner,
        to: AccountAddress,
        coin_type: &str,
        amount: u64,
    ) -> Result<String, SdkError> {
        let coin = StructTag::from_str(coin_type)?;
        let payload = EntryFunction::natural(
            "0x1::endless_account",
            "transfer_coins",
            vec![TypeTag::Struct(Box::new(coin))],
            vec![TransactionArgument::new(&to), TransactionArgument::new(&amount)],
        )?;
        let signed = self.create_signed_transaction(sender, payload).await?;
        self.submit(&signed).await
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn expiration(&self) -> Result<u64, SdkError> {
        Ok(unix_now()?.saturating_add(self.client.config.expiration_ttl.as_secs()))
    }

    fn raw_transaction(
        &self,
        sender: AccountAddress,
        sequence_number: u64,
        chain_id: u8,
        expiration_timestamp_secs: u64,
        payload: TransactionPayload,
    ) -> RawTransaction {
        RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount: self.client.config.max_gas_amount,
            gas_unit_price: self.client.config.gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// A sequence number was taken for `sender` but no transaction came of
    /// it; make the next acquisition re-read the node.
    async fn release_on_error<V>(&self, sender: AccountAddress, result: SdkResult<V>) -> SdkResult<V> {
        if let Err(e) = &result {
            tracing::warn!(%sender, error = %e, "Signing failed, resyncing sequence number");
            self.client.sequence_numbers.resync(sender).await;
        }
        result
    }

    /// One status query bounded by `bound`; `None` when it runs out.
    async fn poll_once(
        &self,
        hash: &str,
        bound: Duration,
    ) -> Result<Option<TransactionStatus>, SdkError> {
        let request = self.status(hash);
        let timer = Delay::new(bound);
        pin_mut!(request);

        match future::select(request, timer).await {
            Either::Left((status, _)) => status.map(Some),
            Either::Right(((), _)) => Ok(None),
        }
    }
}

fn sign_single(raw: RawTransaction, signer: &impl TransactionSigner) -> SdkResult<SignedTransaction> {
    let mut session = SigningSession::new(TransactionVariant::SingleSender(raw))?;
    session.sign_as_sender(signer)?;
    session.finish()
}

fn sign_multi_agent(
    raw: RawTransaction,
    sender: &impl TransactionSigner,
    secondary: &[&dyn TransactionSigner],
) -> SdkResult<SignedTransaction> {
    let mut session = SigningSession::new(TransactionVariant::MultiAgent {
        raw,
        secondary_signers: secondary.iter().map(|s| s.address()).collect(),
    })?;
    session.sign_as_sender(sender)?;
    for signer in secondary {
        session.sign_as_secondary(signer)?;
    }
    session.finish()
}

fn sign_fee_payer(
    raw: RawTransaction,
    sender: &impl TransactionSigner,
    secondary: &[&dyn TransactionSigner],
    fee_payer: &impl TransactionSigner,
) -> SdkResult<SignedTransaction> {
    let mut session = SigningSession::new(TransactionVariant::FeePayer {
        raw,
        secondary_signers: secondary.iter().map(|s| s.address()).collect(),
        fee_payer: Some(fee_payer.address()),
    })?;
    session.sign_as_sender(sender)?;
    for signer in secondary {
        session.sign_as_secondary(signer)?;
    }
    session.sign_as_fee_payer(fee_payer)?;
    session.finish()
}

/// 4xx → [`SdkError::Rejected`]; other failures keep their HTTP class.
fn reject_client_errors(resp: HttpResponse) -> Result<HttpResponse, SdkError> {
    match resp.status {
        400..=499 if resp.status != 429 => Err(SdkError::Rejected {
            status: resp.status,
            detail: resp.body,
        }),
        _ => resp.error_for_status().map_err(|e: HttpError| e.into()),
    }
}
