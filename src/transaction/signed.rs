//! The terminal, wire-ready transaction.

use sha3::{Digest, Sha3_256};

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, SdkError, SdkResult};
use crate::network::TRANSACTION_SALT;
use crate::transaction::authenticator::{AccountAuthenticator, TransactionAuthenticator};
use crate::transaction::raw::{salt_prefix, RawTransaction, TransactionVariant};

/// A raw transaction with every required signature attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    raw_txn: RawTransaction,
    authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    // `Transaction::UserTransaction` discriminant inside the hashed envelope.
    const USER_TRANSACTION: u8 = 0;

    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    pub fn raw_txn(&self) -> &RawTransaction {
        &self.raw_txn
    }

    pub fn authenticator(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    /// The exact bytes submitted to the node.
    pub fn bytes(&self) -> Vec<u8> {
        bcs::to_bytes(self)
    }

    /// Hash the node assigns once the transaction is accepted.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(salt_prefix(TRANSACTION_SALT));
        hasher.update([Self::USER_TRANSACTION]);
        hasher.update(self.bytes());
        hasher.finalize().into()
    }

    /// `0x`-prefixed hex of [`hash`](Self::hash).
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash()))
    }

    /// The signing topology this authenticator claims.
    pub fn variant(&self) -> TransactionVariant {
        let raw = self.raw_txn.clone();
        match &self.authenticator {
            TransactionAuthenticator::Ed25519 { .. }
            | TransactionAuthenticator::SingleSender { .. } => TransactionVariant::SingleSender(raw),
            TransactionAuthenticator::MultiAgent {
                secondary_signer_addresses,
                ..
            } => TransactionVariant::MultiAgent {
                raw,
                secondary_signers: secondary_signer_addresses.clone(),
            },
            TransactionAuthenticator::FeePayer {
                secondary_signer_addresses,
                fee_payer_address,
                ..
            } => TransactionVariant::FeePayer {
                raw,
                secondary_signers: secondary_signer_addresses.clone(),
                fee_payer: Some(*fee_payer_address),
            },
        }
    }

    /// Check every signature against the message of the claimed topology.
    pub fn verify(&self) -> SdkResult<()> {
        let message = self.variant().signing_message();
        match &self.authenticator {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(*public_key, *signature).verify(&message),
            TransactionAuthenticator::SingleSender { sender } => sender.verify(&message),
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                check_counts(secondary_signer_addresses.len(), secondary_signers.len())?;
                sender.verify(&message)?;
                secondary_signers
                    .iter()
                    .try_for_each(|signer| signer.verify(&message))
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_signer,
                ..
            } => {
                check_counts(secondary_signer_addresses.len(), secondary_signers.len())?;
                sender.verify(&message)?;
                secondary_signers
                    .iter()
                    .try_for_each(|signer| signer.verify(&message))?;
                fee_payer_signer.verify(&message)
            }
        }
    }
}

fn check_counts(addresses: usize, signers: usize) -> SdkResult<()> {
    if addresses != signers {
        return Err(SdkError::SignatureMismatch(format!(
            "{addresses} secondary addresses but {signers} secondary signatures"
        )));
    }
    Ok(())
}

impl BcsSerialize for SignedTransaction {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        self.raw_txn.serialize(serializer);
        self.authenticator.serialize(serializer);
    }
}

impl BcsDeserialize for SignedTransaction {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        Ok(Self {
            raw_txn: RawTransaction::deserialize(deserializer)?,
            authenticator: TransactionAuthenticator::deserialize(deserializer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::authenticator::{Ed25519PublicKey, Ed25519Signature};
    use crate::transaction::raw::tests::sample_raw;
    use crate::types::AccountAddress;

    fn fake_auth(byte: u8) -> AccountAuthenticator {
        AccountAuthenticator::ed25519(
            Ed25519PublicKey::new([byte; 32]),
            Ed25519Signature::new([byte; 64]),
        )
    }

    #[test]
    fn test_bytes_are_raw_then_authenticator() {
        let raw = sample_raw();
        let authenticator = TransactionAuthenticator::single(fake_auth(1));
        let signed = SignedTransaction::new(raw.clone(), authenticator.clone());

        let mut expected = bcs::to_bytes(&raw);
        expected.extend(bcs::to_bytes(&authenticator));
        assert_eq!(signed.bytes(), expected);
        assert_eq!(bcs::from_bytes::<SignedTransaction>(&expected).unwrap(), signed);
    }

    #[test]
    fn test_hash_is_stable_and_prefixed() {
        let signed =
            SignedTransaction::new(sample_raw(), TransactionAuthenticator::single(fake_auth(1)));
        let hex = signed.hash_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert_eq!(signed.hash(), signed.clone().hash());

        let other =
            SignedTransaction::new(sample_raw(), TransactionAuthenticator::single(fake_auth(2)));
        assert_ne!(signed.hash(), other.hash());
    }

    #[test]
    fn test_variant_follows_authenticator() {
        let b: AccountAddress = "0xb".parse().unwrap();
        let sponsor: AccountAddress = "0x99".parse().unwrap();
        let signed = SignedTransaction::new(
            sample_raw(),
            TransactionAuthenticator::fee_payer(
                fake_auth(1),
                vec![(b, fake_auth(2))],
                (sponsor, fake_auth(3)),
            ),
        );
        let variant = signed.variant();
        assert_eq!(variant.secondary_signers(), &[b]);
        assert_eq!(variant.fee_payer(), Some(sponsor));
    }

    #[test]
    fn test_verify_rejects_count_mismatch() {
        let signed = SignedTransaction::new(
            sample_raw(),
            TransactionAuthenticator::MultiAgent {
                sender: fake_auth(1),
                secondary_signer_addresses: vec!["0xb".parse().unwrap()],
                secondary_signers: vec![],
            },
        );
        assert!(matches!(
            signed.verify(),
            Err(SdkError::SignatureMismatch(_))
        ));
    }

    #[test]
    fn test_verify_rejects_forged_signature() {
        let signed =
            SignedTransaction::new(sample_raw(), TransactionAuthenticator::single(fake_auth(7)));
        assert!(signed.verify().is_err());
    }
}
