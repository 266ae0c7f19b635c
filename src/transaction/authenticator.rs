//! Authenticators: signatures bound to a transaction per signing topology.

use solana_signature::Signature;

use crate::bcs::{self, BcsDeserialize, BcsSerialize};
use crate::error::{BcsError, SdkError, SdkResult};
use crate::types::AccountAddress;

// ============================================================================
// Ed25519 key material
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    pub const LENGTH: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Address of a fresh account controlled by this key.
    pub fn derive_address(&self) -> AccountAddress {
        AccountAddress::from_ed25519_public_key(&self.0)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey(0x{})", hex::encode(self.0))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
    pub const LENGTH: usize = 64;

    pub const fn new(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// All-zero signature used when simulating.
    pub const fn zero() -> Self {
        Self([0u8; 64])
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature(0x{})", hex::encode(self.0))
    }
}

fn read_key_bytes<const N: usize>(
    deserializer: &mut bcs::Deserializer<'_>,
    what: &str,
) -> Result<[u8; N], BcsError> {
    let len = deserializer.length()?;
    if len != N {
        return Err(BcsError::invalid(format!(
            "{what} must be {N} bytes, got {len}"
        )));
    }
    deserializer.fixed_array()
}

impl BcsSerialize for Ed25519PublicKey {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.bytes(&self.0);
    }
}

impl BcsDeserialize for Ed25519PublicKey {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        read_key_bytes(deserializer, "ed25519 public key").map(Self)
    }
}

impl BcsSerialize for Ed25519Signature {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        serializer.bytes(&self.0);
    }
}

impl BcsDeserialize for Ed25519Signature {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        read_key_bytes(deserializer, "ed25519 signature").map(Self)
    }
}

// ============================================================================
// AccountAuthenticator
// ============================================================================

/// One party's signature over a signing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAuthenticator {
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
}

impl AccountAuthenticator {
    const ED25519: u32 = 0;

    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        AccountAuthenticator::Ed25519 {
            public_key,
            signature,
        }
    }

    /// Authenticator with a zeroed signature, accepted only by simulation.
    pub fn for_simulation(public_key: Ed25519PublicKey) -> Self {
        Self::ed25519(public_key, Ed25519Signature::zero())
    }

    /// Check the signature over `message`.
    pub fn verify(&self, message: &[u8]) -> SdkResult<()> {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                let sig = Signature::from(*signature.as_bytes());
                if sig.verify(public_key.as_bytes(), message) {
                    Ok(())
                } else {
                    Err(SdkError::SignatureMismatch(format!(
                        "ed25519 signature does not verify for {:?}",
                        public_key
                    )))
                }
            }
        }
    }
}

impl BcsSerialize for AccountAuthenticator {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.uleb128(Self::ED25519);
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
        }
    }
}

impl BcsDeserialize for AccountAuthenticator {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        match deserializer.uleb128()? {
            Self::ED25519 => Ok(AccountAuthenticator::Ed25519 {
                public_key: Ed25519PublicKey::deserialize(deserializer)?,
                signature: Ed25519Signature::deserialize(deserializer)?,
            }),
            other => Err(BcsError::invalid(format!(
                "unsupported account authenticator {other}"
            ))),
        }
    }
}

// ============================================================================
// TransactionAuthenticator
// ============================================================================

/// All signatures for a transaction, shaped by its signing topology.
///
/// Secondary signers are matched to their authenticators by position, so
/// `secondary_signer_addresses[i]` must be the party behind
/// `secondary_signers[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Single sender, single key.
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    MultiAgent {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    },
    FeePayer {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    },
    /// Single sender with any account authenticator scheme.
    SingleSender { sender: AccountAuthenticator },
}

impl TransactionAuthenticator {
    pub const ED25519: u32 = 0;
    // 1 is multi-ed25519, not produced by this SDK.
    pub const MULTI_AGENT: u32 = 2;
    pub const FEE_PAYER: u32 = 3;
    pub const SINGLE_SENDER: u32 = 4;

    /// Single-sender authenticator from the sender's signature.
    pub fn single(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            },
        }
    }

    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary: Vec<(AccountAddress, AccountAuthenticator)>,
    ) -> Self {
        let (secondary_signer_addresses, secondary_signers) = secondary.into_iter().unzip();
        TransactionAuthenticator::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }

    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary: Vec<(AccountAddress, AccountAuthenticator)>,
        fee_payer: (AccountAddress, AccountAuthenticator),
    ) -> Self {
        let (secondary_signer_addresses, secondary_signers) = secondary.into_iter().unzip();
        TransactionAuthenticator::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address: fee_payer.0,
            fee_payer_signer: fee_payer.1,
        }
    }

    /// The sender's authenticator.
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(*public_key, *signature),
            TransactionAuthenticator::MultiAgent { sender, .. }
            | TransactionAuthenticator::FeePayer { sender, .. }
            | TransactionAuthenticator::SingleSender { sender } => sender.clone(),
        }
    }

    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            TransactionAuthenticator::MultiAgent {
                secondary_signer_addresses,
                ..
            }
            | TransactionAuthenticator::FeePayer {
                secondary_signer_addresses,
                ..
            } => secondary_signer_addresses,
            _ => &[],
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            TransactionAuthenticator::FeePayer {
                fee_payer_address, ..
            } => Some(*fee_payer_address),
            _ => None,
        }
    }
}

impl BcsSerialize for TransactionAuthenticator {
    fn serialize(&self, serializer: &mut bcs::Serializer) {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                serializer.uleb128(Self::ED25519);
                public_key.serialize(serializer);
                signature.serialize(serializer);
            }
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                serializer.uleb128(Self::MULTI_AGENT);
                sender.serialize(serializer);
                serializer.sequence(secondary_signer_addresses);
                serializer.sequence(secondary_signers);
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                serializer.uleb128(Self::FEE_PAYER);
                sender.serialize(serializer);
                serializer.sequence(secondary_signer_addresses);
                serializer.sequence(secondary_signers);
                fee_payer_address.serialize(serializer);
                fee_payer_signer.serialize(serializer);
            }
            TransactionAuthenticator::SingleSender { sender } => {
                serializer.uleb128(Self::SINGLE_SENDER);
                sender.serialize(serializer);
            }
        }
    }
}

impl BcsDeserialize for TransactionAuthenticator {
    fn deserialize(deserializer: &mut bcs::Deserializer<'_>) -> Result<Self, BcsError> {
        let authenticator = match deserializer.uleb128()? {
            Self::ED25519 => TransactionAuthenticator::Ed25519 {
                public_key: Ed25519PublicKey::deserialize(deserializer)?,
                signature: Ed25519Signature::deserialize(deserializer)?,
            },
            Self::MULTI_AGENT => TransactionAuthenticator::MultiAgent {
                sender: AccountAuthenticator::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.sequence()?,
                secondary_signers: deserializer.sequence()?,
            },
            Self::FEE_PAYER => TransactionAuthenticator::FeePayer {
                sender: AccountAuthenticator::deserialize(deserializer)?,
                secondary_signer_addresses: deserializer.sequence()?,
                secondary_signers: deserializer.sequence()?,
                fee_payer_address: AccountAddress::deserialize(deserializer)?,
                fee_payer_signer: AccountAuthenticator::deserialize(deserializer)?,
            },
            Self::SINGLE_SENDER => TransactionAuthenticator::SingleSender {
                sender: AccountAuthenticator::deserialize(deserializer)?,
            },
            other => {
                return Err(BcsError::invalid(format!(
                    "unsupported transaction authenticator {other}"
                )))
            }
        };
        Ok(authenticator)
    }
}
