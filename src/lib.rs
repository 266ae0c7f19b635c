//! # Endless SDK
//!
//! A Rust SDK for the Endless network: canonical BCS encoding, Move type
//! tags, transaction construction with single, multi-agent and fee-payer
//! signing, and submission with confirmation polling.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core**: BCS codec, value types, transactions (always available, no I/O)
//! 2. **Auth**: the `TransactionSigner` collaborator + local ed25519 signing
//! 3. **HTTP**: the `Transport` collaborator + `EndlessHttp` with retry policies
//! 4. **Domain**: wire types, conversions and per-domain sub-clients
//! 5. **High-Level Client**: `EndlessClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use endless_sdk::prelude::*;
//!
//! let client = EndlessClient::builder()
//!     .base_url("https://rpc-test.endless.link/v1")
//!     .build()?;
//!
//! let alice = LocalAccount::generate();
//! let hash = client.transactions().transfer(&alice, bob, 1_000).await?;
//! let committed = client.transactions().wait_for_transaction(&hash).await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Canonical binary encoding.
pub mod bcs;

/// Addresses, wide integers and Move type tags.
pub mod types;

/// Payloads, raw transactions, authenticators and signing sessions.
pub mod transaction;

/// Unified SDK error types.
pub mod error;

/// Network constants.
pub mod network;

/// Serde helpers shared by wire types.
pub mod shared;

// ── Layer 2: Auth ────────────────────────────────────────────────────────────

/// Signing collaborators.
pub mod auth;

// ── Layer 3: HTTP ────────────────────────────────────────────────────────────

/// Transport trait and the reqwest transport.
pub mod http;

// ── Layer 4: Domain ──────────────────────────────────────────────────────────

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `EndlessClient`: the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Codec
    pub use crate::bcs::{BcsDeserialize, BcsSerialize};

    // Value types
    pub use crate::types::{AccountAddress, ModuleId, StructTag, TypeTag, U256};

    // Transactions
    pub use crate::transaction::{
        AccountAuthenticator, EntryFunction, RawTransaction, SignedTransaction, SigningSession,
        SigningState, TransactionArgument, TransactionAuthenticator, TransactionBuilder,
        TransactionPayload, TransactionVariant,
    };

    // Domain types
    pub use crate::domain::account::{AccountInfo, SequenceNumberTracker};
    pub use crate::domain::ledger::LedgerInfo;
    pub use crate::domain::transaction::{CommittedTransaction, TransactionStatus};

    // Errors
    pub use crate::error::{BcsError, HttpError, ParseError, SdkError, SdkResult};

    // Auth
    pub use crate::auth::TransactionSigner;
    #[cfg(feature = "native-auth")]
    pub use crate::auth::native::LocalAccount;

    // Client + sub-clients
    pub use crate::client::{
        AccountsClient, ClientConfig, EndlessClient, EndlessClientBuilder, LedgerClient,
        TransactionsClient, ViewClient,
    };
    pub use crate::http::{HttpResponse, RetryConfig, RetryPolicy, Transport};
    #[cfg(feature = "http")]
    pub use crate::http::EndlessHttp;
}
