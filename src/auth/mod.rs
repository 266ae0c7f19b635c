//! Signing collaborators.
//!
//! The SDK never stores or inspects keys. Anything that can produce an
//! [`AccountAuthenticator`] for its own address over arbitrary bytes can sign
//! a transaction:
//!
//! - **Native**: [`native::LocalAccount`] wraps an in-memory ed25519 keypair
//!   (feature `native-auth`).
//! - **External**: wallets, HSMs and remote signers implement
//!   [`TransactionSigner`] directly.

#[cfg(feature = "native-auth")]
pub mod native;

use crate::error::SdkResult;
use crate::transaction::AccountAuthenticator;
use crate::types::AccountAddress;

/// Opaque `sign(bytes) -> signature` capability bound to one account.
pub trait TransactionSigner {
    /// The account this signer authorizes for.
    fn address(&self) -> AccountAddress;

    /// Sign a transaction signing message.
    fn sign(&self, message: &[u8]) -> SdkResult<AccountAuthenticator>;
}

impl<S: TransactionSigner + ?Sized> TransactionSigner for &S {
    fn address(&self) -> AccountAddress {
        (**self).address()
    }

    fn sign(&self, message: &[u8]) -> SdkResult<AccountAuthenticator> {
        (**self).sign(message)
    }
}
