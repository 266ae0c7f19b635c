//! Raw transaction body and the signing topologies built on it.

use sha3::{Digest, Sha3_256};

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::BcsError;
use crate::network::{RAW_TRANSACTION_SALT, RAW_TRANSACTION_WITH_DATA_SALT};
use crate::transaction::payload::TransactionPayload;
use crate::types::AccountAddress;

/// `sha3_256(seed)`, the domain separator placed before signed bytes.
pub(crate) fn salt_prefix(seed: &str) -> [u8; 32] {
    Sha3_256::digest(seed.as_bytes()).into()
}

/// The transaction body every signing topology shares unmodified.
///
/// Layout: `sender | sequence_number | payload | max_gas_amount |
/// gas_unit_price | expiration_timestamp_secs | chain_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: AccountAddress,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub expiration_timestamp_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// Bytes a single sender signs.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut serializer = bcs::Serializer::new();
        serializer.fixed_bytes(&salt_prefix(RAW_TRANSACTION_SALT));
        self.serialize(&mut serializer);
        serializer.into_bytes()
    }
}

impl BcsSerialize for RawTransaction {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        self.sender.serialize(serializer);
        serializer.u64(self.sequence_number);
        self.payload.serialize(serializer);
        serializer.u64(self.max_gas_amount);
        serializer.u64(self.gas_unit_price);
        serializer.u64(self.expiration_timestamp_secs);
        serializer.u8(self.chain_id);
    }
}

impl BcsDeserialize for RawTransaction {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            sender: AccountAddress::deserialize(deserializer)?,
            sequence_number: deserializer.u64()?,
            payload: TransactionPayload::deserialize(deserializer)?,
            max_gas_amount: deserializer.u64()?,
            gas_unit_price: deserializer.u64()?,
            expiration_timestamp_secs: deserializer.u64()?,
            chain_id: deserializer.u8()?,
        })
    }
}

/// A raw transaction together with the parties that must sign it.
///
/// The wrapper changes only what is signed; `raw()` is identical in every
/// variant and is what ends up in the signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionVariant {
    SingleSender(RawTransaction),
    MultiAgent {
        raw: RawTransaction,
        secondary_signers: Vec<AccountAddress>,
    },
    FeePayer {
        raw: RawTransaction,
        secondary_signers: Vec<AccountAddress>,
        /// `None` while the sponsor is unknown (simulation); signed as `0x0`.
        fee_payer: Option<AccountAddress>,
    },
}

impl TransactionVariant {
    // `RawTransactionWithData` discriminants.
    const MULTI_AGENT: u32 = 0;
    const MULTI_AGENT_WITH_FEE_PAYER: u32 = 1;

    pub fn raw(&self) -> &RawTransaction {
        match self {
            TransactionVariant::SingleSender(raw)
            | TransactionVariant::MultiAgent { raw, .. }
            | TransactionVariant::FeePayer { raw, .. } => raw,
        }
    }

    pub fn into_raw(self) -> RawTransaction {
        match self {
            TransactionVariant::SingleSender(raw)
            | TransactionVariant::MultiAgent { raw, .. }
            | TransactionVariant::FeePayer { raw, .. } => raw,
        }
    }

    pub fn secondary_signers(&self) -> &[AccountAddress] {
        match self {
            TransactionVariant::SingleSender(_) => &[],
            TransactionVariant::MultiAgent {
                secondary_signers, ..
            }
            | TransactionVariant::FeePayer {
                secondary_signers, ..
            } => secondary_signers,
        }
    }

    pub fn fee_payer(&self) -> Option<AccountAddress> {
        match self {
            TransactionVariant::FeePayer { fee_payer, .. } => *fee_payer,
            _ => None,
        }
    }

    pub fn has_fee_payer_slot(&self) -> bool {
        matches!(self, TransactionVariant::FeePayer { .. })
    }

    /// Bytes every party in this topology signs.
    ///
    /// Multi-agent and fee-payer messages commit to the ordered secondary
    /// addresses (and the fee payer), so no party can be swapped after
    /// signing without invalidating every signature.
    pub fn signing_message(&self) -> Vec<u8> {
        let (raw, secondary_signers, variant, fee_payer) = match self {
            TransactionVariant::SingleSender(raw) => return raw.signing_message(),
            TransactionVariant::MultiAgent {
                raw,
                secondary_signers,
            } => (raw, secondary_signers, Self::MULTI_AGENT, None),
            TransactionVariant::FeePayer {
                raw,
                secondary_signers,
                fee_payer,
            } => (
                raw,
                secondary_signers,
                Self::MULTI_AGENT_WITH_FEE_PAYER,
                Some(fee_payer.unwrap_or(AccountAddress::ZERO)),
            ),
        };

        let mut serializer = bcs::Serializer::new();
        serializer.fixed_bytes(&salt_prefix(RAW_TRANSACTION_WITH_DATA_SALT));
        serializer.uleb128(variant);
        raw.serialize(&mut serializer);
        serializer.sequence(secondary_signers);
        if let Some(address) = fee_payer {
            address.serialize(&mut serializer);
        }
        serializer.into_bytes()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transaction::payload::{EntryFunction, TransactionArgument};

    pub(crate) fn sample_raw() -> RawTransaction {
        RawTransaction {
            sender: "0xa11ce".parse().unwrap(),
            sequence_number: 7,
            payload: EntryFunction::natural(
                "0x1::endless_account",
                "transfer",
                vec![],
                vec![
                    TransactionArgument::new(&AccountAddress::ONE),
                    TransactionArgument::new(&10u128),
                ],
            )
            .unwrap()
            .into(),
            max_gas_amount: 100_000,
            gas_unit_price: 100,
            expiration_timestamp_secs: 1_700_000_600,
            chain_id: 4,
        }
    }

    #[test]
    fn test_raw_transaction_field_order() {
        let raw = sample_raw();
        let bytes = bcs::to_bytes(&raw);
        assert_eq!(&bytes[..32], raw.sender.as_bytes());
        assert_eq!(&bytes[32..40], &7u64.to_le_bytes());
        let tail = &bytes[bytes.len() - 25..];
        assert_eq!(&tail[..8], &100_000u64.to_le_bytes());
        assert_eq!(&tail[8..16], &100u64.to_le_bytes());
        assert_eq!(&tail[16..24], &1_700_000_600u64.to_le_bytes());
        assert_eq!(tail[24], 4);
        assert_eq!(bcs::from_bytes::<RawTransaction>(&bytes).unwrap(), raw);
    }

    #[test]
    fn test_single_sender_message_is_salted() {
        let raw = sample_raw();
        let message = raw.signing_message();
        assert_eq!(&message[..32], &salt_prefix(RAW_TRANSACTION_SALT));
        assert_eq!(&message[32..], bcs::to_bytes(&raw).as_slice());
        assert_eq!(
            TransactionVariant::SingleSender(raw).signing_message(),
            message
        );
    }

    #[test]
    fn test_multi_agent_message_commits_to_secondaries() {
        let raw = sample_raw();
        let b: AccountAddress = "0xb0b".parse().unwrap();
        let c: AccountAddress = "0xc0c".parse().unwrap();

        let bc = TransactionVariant::MultiAgent {
            raw: raw.clone(),
            secondary_signers: vec![b, c],
        };
        let cb = TransactionVariant::MultiAgent {
            raw: raw.clone(),
            secondary_signers: vec![c, b],
        };
        assert_ne!(bc.signing_message(), cb.signing_message());

        let message = bc.signing_message();
        let raw_bytes = bcs::to_bytes(&raw);
        assert_eq!(&message[..32], &salt_prefix(RAW_TRANSACTION_WITH_DATA_SALT));
        assert_eq!(message[32], 0);
        assert_eq!(&message[33..33 + raw_bytes.len()], raw_bytes.as_slice());
        assert_eq!(message[33 + raw_bytes.len()], 2);
        assert_eq!(message.len(), 33 + raw_bytes.len() + 1 + 64);
    }

    #[test]
    fn test_fee_payer_message_binds_sponsor() {
        let raw = sample_raw();
        let sponsor: AccountAddress = "0x5905".parse().unwrap();
        let unassigned = TransactionVariant::FeePayer {
            raw: raw.clone(),
            secondary_signers: vec![],
            fee_payer: None,
        };
        let assigned = TransactionVariant::FeePayer {
            raw: raw.clone(),
            secondary_signers: vec![],
            fee_payer: Some(sponsor),
        };

        let unassigned_msg = unassigned.signing_message();
        let assigned_msg = assigned.signing_message();
        assert_ne!(unassigned_msg, assigned_msg);
        assert_eq!(unassigned_msg[32], 1);
        assert_eq!(&unassigned_msg[unassigned_msg.len() - 32..], AccountAddress::ZERO.as_bytes());
        assert_eq!(&assigned_msg[assigned_msg.len() - 32..], sponsor.as_bytes());
        assert_eq!(assigned.raw(), unassigned.raw());
    }
}
