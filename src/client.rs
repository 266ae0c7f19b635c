//! High-level client: `EndlessClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the configuration, the builder, shared cache state and
//! the accessor methods.

use async_lock::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::account::client::Accounts;
use crate::domain::account::SequenceNumberTracker;
use crate::domain::ledger::client::Ledger;
use crate::domain::transaction::client::Transactions;
use crate::domain::view::client::View;
use crate::http::{RetryPolicy, Transport};
use crate::transaction::builder::{
    DEFAULT_EXPIRATION_TTL, DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT,
};

#[cfg(feature = "http")]
use crate::error::SdkError;
#[cfg(feature = "http")]
use crate::http::EndlessHttp;

// Re-export sub-client types for convenience.
pub use crate::domain::account::client::Accounts as AccountsClient;
pub use crate::domain::ledger::client::Ledger as LedgerClient;
pub use crate::domain::transaction::client::Transactions as TransactionsClient;
pub use crate::domain::view::client::View as ViewClient;

/// Transaction defaults and confirmation timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Added to the current time to form each transaction's expiration.
    pub expiration_ttl: Duration,
    pub gas_unit_price: u64,
    pub max_gas_amount: u64,
    /// Wall-clock bound on confirmation; at most
    /// `ceil(transaction_wait / poll_interval)` polls fit in it.
    pub transaction_wait: Duration,
    pub poll_interval: Duration,
    /// Bound on a single request, including each status poll.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            expiration_ttl: DEFAULT_EXPIRATION_TTL,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            transaction_wait: Duration::from_secs(20),
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The primary entry point for the Endless SDK.
///
/// Owns its transport; there is no process-wide client. Provides nested
/// sub-client accessors: `client.accounts()`, `client.transactions()`,
/// `client.ledger()` and `client.view()`.
pub struct EndlessClient<T: Transport> {
    pub(crate) transport: T,
    pub(crate) config: ClientConfig,
    /// Chain id, read from the node on first use.
    pub(crate) chain_id: Arc<RwLock<Option<u8>>>,
    pub(crate) sequence_numbers: SequenceNumberTracker,
}

#[cfg(feature = "http")]
impl EndlessClient<EndlessHttp> {
    pub fn builder() -> EndlessClientBuilder {
        EndlessClientBuilder::default()
    }
}

impl<T: Transport> EndlessClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            chain_id: Arc::new(RwLock::new(None)),
            sequence_numbers: SequenceNumberTracker::new(),
        }
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn accounts(&self) -> Accounts<'_, T> {
        Accounts { client: self }
    }

    pub fn transactions(&self) -> Transactions<'_, T> {
        Transactions { client: self }
    }

    pub fn ledger(&self) -> Ledger<'_, T> {
        Ledger { client: self }
    }

    pub fn view(&self) -> View<'_, T> {
        View { client: self }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Forget the cached chain id and every cached sequence number.
    pub async fn clear_all_caches(&self) {
        *self.chain_id.write().await = None;
        self.sequence_numbers.clear().await;
    }
}

impl<T: Transport + Clone> Clone for EndlessClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            config: self.config.clone(),
            chain_id: self.chain_id.clone(),
            sequence_numbers: self.sequence_numbers.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct EndlessClientBuilder {
    base_url: String,
    config: ClientConfig,
    chain_id: Option<u8>,
    read_retry: RetryPolicy,
}

impl Default for EndlessClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_NODE_URL.to_string(),
            config: ClientConfig::default(),
            chain_id: None,
            read_retry: RetryPolicy::Idempotent,
        }
    }
}

impl EndlessClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Pre-set the chain id so the node is never asked for it.
    pub fn chain_id(mut self, chain_id: u8) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Retry policy for GET requests of the built-in HTTP transport.
    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    /// Build with the reqwest transport against `base_url`.
    #[cfg(feature = "http")]
    pub fn build(self) -> Result<EndlessClient<EndlessHttp>, SdkError> {
        let http = EndlessHttp::with_timeout(&self.base_url, self.config.request_timeout)?
            .read_retry(self.read_retry.clone());
        Ok(self.transport(http))
    }

    /// Build over a caller-supplied transport; `base_url` and `read_retry`
    /// are ignored.
    pub fn transport<T: Transport>(self, transport: T) -> EndlessClient<T> {
        let mut client = EndlessClient::new(transport, self.config);
        if let Some(chain_id) = self.chain_id {
            client.chain_id = Arc::new(RwLock::new(Some(chain_id)));
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::http::{HttpResponse, QueryParams};
    use crate::types::AccountAddress;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Answers every GET with the same account record and counts requests.
    #[derive(Default)]
    struct CountingNode {
        gets: AtomicU32,
    }

    impl Transport for CountingNode {
        async fn get(&self, path: &str, _: QueryParams<'_>) -> Result<HttpResponse, HttpError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            let body = if path == "/" {
                r#"{"chain_id":2,"epoch":"1","ledger_version":"9","ledger_timestamp":"0","block_height":"3"}"#
            } else {
                r#"{"sequence_number":"40","authentication_key":"0x00"}"#
            };
            Ok(HttpResponse::new(200, body))
        }

        async fn post(
            &self,
            _: &str,
            _: QueryParams<'_>,
            _: Vec<u8>,
            _: &str,
        ) -> Result<HttpResponse, HttpError> {
            Ok(HttpResponse::new(500, "unused"))
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.expiration_ttl, Duration::from_secs(600));
        assert_eq!(config.gas_unit_price, 100);
        assert_eq!(config.max_gas_amount, 100_000);
        assert_eq!(config.transaction_wait, Duration::from_secs(20));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_clear_all_caches_forces_refetch() {
        let client = EndlessClient::new(CountingNode::default(), ClientConfig::default());
        let sender = AccountAddress::ONE;

        tokio_test::block_on(async {
            assert_eq!(client.ledger().chain_id().await.unwrap(), 2);
            assert_eq!(client.accounts().next_sequence_number(sender).await.unwrap(), 40);
            assert_eq!(client.accounts().next_sequence_number(sender).await.unwrap(), 41);
            assert_eq!(client.transport().gets.load(Ordering::SeqCst), 2);

            client.clear_all_caches().await;
            assert_eq!(client.ledger().chain_id().await.unwrap(), 2);
            assert_eq!(client.accounts().next_sequence_number(sender).await.unwrap(), 40);
            assert_eq!(client.transport().gets.load(Ordering::SeqCst), 4);
        });
    }

    #[test]
    fn test_builder_preset_chain_id() {
        let client = EndlessClientBuilder::default()
            .chain_id(7)
            .transport(CountingNode::default());
        tokio_test::block_on(async {
            assert_eq!(client.ledger().chain_id().await.unwrap(), 7);
        });
        assert_eq!(client.transport().gets.load(Ordering::SeqCst), 0);
    }
}
