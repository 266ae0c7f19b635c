//! Native auth: keypair-backed signing.
//!
//! Only available with the `native-auth` feature.

use solana_keypair::Keypair;
use solana_signer::Signer;

use crate::auth::TransactionSigner;
use crate::error::{SdkError, SdkResult};
use crate::transaction::{AccountAuthenticator, Ed25519PublicKey, Ed25519Signature};
use crate::types::AccountAddress;

/// An ed25519 account whose private key lives in memory.
pub struct LocalAccount {
    keypair: Keypair,
    address: AccountAddress,
}

impl LocalAccount {
    /// Fresh random key; the address is derived from it.
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::new())
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        let address = AccountAddress::from_ed25519_public_key(&keypair.pubkey().to_bytes());
        Self { keypair, address }
    }

    /// Restore from a 32-byte ed25519 secret key.
    pub fn from_secret_key(secret: [u8; 32]) -> Self {
        Self::from_keypair(Keypair::new_from_array(secret))
    }

    /// Bind a key to an account whose authentication key was rotated to it.
    pub fn with_address(keypair: Keypair, address: AccountAddress) -> Self {
        Self { keypair, address }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::new(self.keypair.pubkey().to_bytes())
    }

    /// Zero-signature authenticator for `/transactions/simulate`.
    pub fn simulation_authenticator(&self) -> AccountAuthenticator {
        AccountAuthenticator::for_simulation(self.public_key())
    }
}

impl TransactionSigner for LocalAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn sign(&self, message: &[u8]) -> SdkResult<AccountAuthenticator> {
        let signature = self.keypair.sign_message(message);
        let bytes = <[u8; 64]>::try_from(signature.as_ref())
            .map_err(|_| SdkError::Signing("signature is not 64 bytes".to_string()))?;
        Ok(AccountAuthenticator::ed25519(
            self.public_key(),
            Ed25519Signature::new(bytes),
        ))
    }
}

impl std::fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
