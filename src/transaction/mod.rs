//! Transactions: payload, raw body, signing topologies, authenticators and
//! the signed wire form.
//!
//! Data flows one way: a [`TransactionPayload`] goes into a
//! [`RawTransaction`], the raw transaction is wrapped in a
//! [`TransactionVariant`] that fixes who signs, a [`SigningSession`]
//! collects one [`AccountAuthenticator`] per party, and the result is a
//! [`SignedTransaction`] ready for submission.

pub mod authenticator;
pub mod builder;
pub mod payload;
pub mod raw;
pub mod session;
pub mod signed;

pub use authenticator::{
    AccountAuthenticator, Ed25519PublicKey, Ed25519Signature, TransactionAuthenticator,
};
pub use builder::TransactionBuilder;
pub use payload::{EntryFunction, TransactionArgument, TransactionPayload};
pub use raw::{RawTransaction, TransactionVariant};
pub use session::{SigningSession, SigningState};
pub use signed::SignedTransaction;
