//! Fluent builder for raw transactions.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::auth::TransactionSigner;
use crate::error::{SdkError, SdkResult};
use crate::transaction::payload::TransactionPayload;
use crate::transaction::raw::{RawTransaction, TransactionVariant};
use crate::transaction::session::SigningSession;
use crate::transaction::signed::SignedTransaction;
use crate::types::AccountAddress;

pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 100_000;
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
pub const DEFAULT_EXPIRATION_TTL: Duration = Duration::from_secs(600);

/// Builder for [`RawTransaction`] with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use endless_sdk::prelude::*;
///
/// let signed = TransactionBuilder::new()
///     .sender(alice.address())
///     .sequence_number(3)
///     .payload(EntryFunction::natural("0x1::endless_account", "transfer", vec![], args)?)
///     .chain_id(4)
///     .build_and_sign(&alice)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: Option<TransactionPayload>,
    max_gas_amount: Option<u64>,
    gas_unit_price: Option<u64>,
    expiration_timestamp_secs: Option<u64>,
    chain_id: Option<u8>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender (required).
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Set the sequence number (required).
    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Set the payload (required).
    pub fn payload(mut self, payload: impl Into<TransactionPayload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn max_gas_amount(mut self, amount: u64) -> Self {
        self.max_gas_amount = Some(amount);
        self
    }

    pub fn gas_unit_price(mut self, price: u64) -> Self {
        self.gas_unit_price = Some(price);
        self
    }

    /// Absolute expiration in unix seconds.
    pub fn expiration_timestamp_secs(mut self, secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(secs);
        self
    }

    /// Expire `ttl` from now. Read once, here; never refreshed.
    pub fn expiration_from_now(mut self, ttl: Duration) -> SdkResult<Self> {
        self.expiration_timestamp_secs = Some(unix_now()?.saturating_add(ttl.as_secs()));
        Ok(self)
    }

    /// Set the chain id (required).
    pub fn chain_id(mut self, chain_id: u8) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Build the raw transaction.
    ///
    /// Gas settings fall back to the defaults; expiration falls back to
    /// [`DEFAULT_EXPIRATION_TTL`] from now.
    pub fn build(self) -> SdkResult<RawTransaction> {
        let expiration_timestamp_secs = match self.expiration_timestamp_secs {
            Some(secs) => secs,
            None => unix_now()?.saturating_add(DEFAULT_EXPIRATION_TTL.as_secs()),
        };

        Ok(RawTransaction {
            sender: self.sender.ok_or(SdkError::MissingField("sender"))?,
            sequence_number: self
                .sequence_number
                .ok_or(SdkError::MissingField("sequence_number"))?,
            payload: self.payload.ok_or(SdkError::MissingField("payload"))?,
            max_gas_amount: self.max_gas_amount.unwrap_or(DEFAULT_MAX_GAS_AMOUNT),
            gas_unit_price: self.gas_unit_price.unwrap_or(DEFAULT_GAS_UNIT_PRICE),
            expiration_timestamp_secs,
            chain_id: self.chain_id.ok_or(SdkError::MissingField("chain_id"))?,
        })
    }

    /// Build and sign as a single-sender transaction.
    ///
    /// The sender defaults to the signer's address when not set.
    pub fn build_and_sign(mut self, signer: &impl TransactionSigner) -> SdkResult<SignedTransaction> {
        if self.sender.is_none() {
            self.sender = Some(signer.address());
        }
        let mut session = SigningSession::new(TransactionVariant::SingleSender(self.build()?))?;
        session.sign_as_sender(signer)?;
        session.finish()
    }

    /// Build a multi-agent transaction and open its signing session.
    pub fn build_multi_agent(
        self,
        secondary_signers: Vec<AccountAddress>,
    ) -> SdkResult<SigningSession> {
        SigningSession::new(TransactionVariant::MultiAgent {
            raw: self.build()?,
            secondary_signers,
        })
    }

    /// Build a sponsored transaction and open its signing session.
    ///
    /// `fee_payer` may be `None` while the sponsor is unknown.
    pub fn build_fee_payer(
        self,
        secondary_signers: Vec<AccountAddress>,
        fee_payer: Option<AccountAddress>,
    ) -> SdkResult<SigningSession> {
        SigningSession::new(TransactionVariant::FeePayer {
            raw: self.build()?,
            secondary_signers,
            fee_payer,
        })
    }
}

pub(crate) fn unix_now() -> SdkResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .map_err(|e| SdkError::Other(format!("system clock before unix epoch: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::raw::tests::sample_raw;

    fn filled() -> TransactionBuilder {
        let raw = sample_raw();
        TransactionBuilder::new()
            .sender(raw.sender)
            .sequence_number(raw.sequence_number)
            .payload(raw.payload)
            .chain_id(raw.chain_id)
    }

    #[test]
    fn test_build_applies_defaults() {
        let before = unix_now().unwrap();
        let raw = filled().build().unwrap();
        assert_eq!(raw.max_gas_amount, DEFAULT_MAX_GAS_AMOUNT);
        assert_eq!(raw.gas_unit_price, DEFAULT_GAS_UNIT_PRICE);
        assert!(raw.expiration_timestamp_secs >= before + 600);
        assert!(raw.expiration_timestamp_secs <= unix_now().unwrap() + 600);
    }

    #[test]
    fn test_build_matches_explicit_fields() {
        let expected = sample_raw();
        let raw = filled()
            .max_gas_amount(expected.max_gas_amount)
            .gas_unit_price(expected.gas_unit_price)
            .expiration_timestamp_secs(expected.expiration_timestamp_secs)
            .build()
            .unwrap();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_build_missing_fields() {
        let err = TransactionBuilder::new().build().unwrap_err();
        assert!(matches!(err, SdkError::MissingField("sender")));

        let err = filled_without_chain().build().unwrap_err();
        assert!(matches!(err, SdkError::MissingField("chain_id")));
    }

    fn filled_without_chain() -> TransactionBuilder {
        let raw = sample_raw();
        TransactionBuilder::new()
            .sender(raw.sender)
            .sequence_number(1)
            .payload(raw.payload)
    }

    #[test]
    fn test_build_multi_agent_opens_session() {
        let bob: AccountAddress = "0xb0b".parse().unwrap();
        let session = filled().build_multi_agent(vec![bob]).unwrap();
        assert_eq!(session.required(), 2);
        assert_eq!(session.variant().secondary_signers(), &[bob]);
    }
}
