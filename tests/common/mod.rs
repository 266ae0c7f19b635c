//! Shared fixtures: an in-memory `Transport` and keypair-backed signers.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use solana_keypair::Keypair;
use solana_signer::Signer;

use endless_sdk::error::{HttpError, SdkResult};
use endless_sdk::http::QueryParams;
use endless_sdk::prelude::*;
use endless_sdk::transaction::{Ed25519PublicKey, Ed25519Signature};

pub const CHAIN_ID: u8 = 4;

#[derive(Debug, Clone)]
pub enum Reply {
    Respond(HttpResponse),
    /// Never answers.
    Hang,
    /// The request never reaches the node.
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Scripted node. Each route replays its replies in order and then repeats
/// the last one; unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(&'static str, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(&self, path: &str, replies: Vec<Reply>) {
        self.script("GET", path, replies);
    }

    pub fn on_post(&self, path: &str, replies: Vec<Reply>) {
        self.script("POST", path, replies);
    }

    fn script(&self, method: &'static str, path: &str, replies: Vec<Reply>) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), replies.into());
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_reply(&self, method: &'static str, path: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Reply::Respond(HttpResponse::new(404, "unscripted"))),
            None => Reply::Respond(HttpResponse::new(404, "unscripted")),
        }
    }

    async fn answer(&self, record: Recorded) -> Result<HttpResponse, HttpError> {
        let reply = self.next_reply(record.method, &record.path);
        self.requests.lock().unwrap().push(record);
        match reply {
            Reply::Respond(resp) => Ok(resp),
            Reply::Hang => futures_util::future::pending().await,
            Reply::Unreachable => Err(HttpError::Timeout),
        }
    }
}

impl Transport for MockTransport {
    async fn get(
        &self,
        path: &str,
        params: QueryParams<'_>,
    ) -> Result<HttpResponse, HttpError> {
        self.answer(Recorded {
            method: "GET",
            path: path.to_string(),
            params: own(params),
            body: Vec::new(),
            content_type: None,
        })
        .await
    }

    async fn post(
        &self,
        path: &str,
        params: QueryParams<'_>,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse, HttpError> {
        self.answer(Recorded {
            method: "POST",
            path: path.to_string(),
            params: own(params),
            body,
            content_type: Some(content_type.to_string()),
        })
        .await
    }
}

fn own(params: &[(&str, String)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ─── Replies ─────────────────────────────────────────────────────────────────

pub fn ok(body: serde_json::Value) -> Reply {
    Reply::Respond(HttpResponse::new(200, body.to_string()))
}

pub fn status(code: u16, body: &str) -> Reply {
    Reply::Respond(HttpResponse::new(code, body))
}

pub fn ledger_info() -> Reply {
    ok(serde_json::json!({
        "chain_id": CHAIN_ID,
        "epoch": "3",
        "ledger_version": "1000",
        "oldest_ledger_version": "0",
        "ledger_timestamp": "1700000000000000",
        "node_role": "full_node",
        "oldest_block_height": "0",
        "block_height": "500"
    }))
}

pub fn account(sequence_number: u64) -> Reply {
    ok(serde_json::json!({
        "sequence_number": sequence_number.to_string(),
        "authentication_key": "0x00"
    }))
}

pub fn pending(hash: &str) -> Reply {
    ok(serde_json::json!({
        "type": "pending_transaction",
        "hash": hash,
        "sender": "0x1",
        "sequence_number": "0"
    }))
}

pub fn committed(hash: &str, success: bool, vm_status: &str) -> Reply {
    ok(serde_json::json!({
        "type": "user_transaction",
        "hash": hash,
        "version": "1234",
        "gas_used": "7",
        "success": success,
        "vm_status": vm_status,
        "events": []
    }))
}

pub fn by_hash_path(hash: &str) -> String {
    format!("/transactions/by_hash/{}", hash)
}

pub fn account_path(address: AccountAddress) -> String {
    format!("/accounts/{}", address)
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Five polls, twenty milliseconds apart.
pub fn fast_config() -> ClientConfig {
    ClientConfig {
        transaction_wait: Duration::from_millis(100),
        poll_interval: Duration::from_millis(20),
        request_timeout: Duration::from_secs(1),
        ..ClientConfig::default()
    }
}

pub fn client(transport: &MockTransport, config: ClientConfig) -> EndlessClient<&MockTransport> {
    EndlessClientBuilder::default().config(config).transport(transport)
}

// ─── Signers ─────────────────────────────────────────────────────────────────

pub struct KeySigner {
    keypair: Keypair,
    address: AccountAddress,
}

impl KeySigner {
    pub fn new() -> Self {
        let keypair = Keypair::new();
        let address = AccountAddress::from_ed25519_public_key(&keypair.pubkey().to_bytes());
        Self { keypair, address }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::new(self.keypair.pubkey().to_bytes())
    }
}

impl TransactionSigner for KeySigner {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn sign(&self, message: &[u8]) -> SdkResult<AccountAuthenticator> {
        let signature = self.keypair.sign_message(message);
        let bytes: [u8; 64] = signature.as_ref().try_into().unwrap();
        Ok(AccountAuthenticator::ed25519(
            self.public_key(),
            Ed25519Signature::new(bytes),
        ))
    }
}

/// Signs for `address` but always fails, like a hardware wallet that was
/// unplugged.
pub struct OfflineSigner(pub AccountAddress);

impl TransactionSigner for OfflineSigner {
    fn address(&self) -> AccountAddress {
        self.0
    }

    fn sign(&self, _message: &[u8]) -> SdkResult<AccountAuthenticator> {
        Err(SdkError::Signing("device not connected".to_string()))
    }
}

pub fn transfer_payload(to: AccountAddress, amount: u128) -> EntryFunction {
    EntryFunction::natural(
        "0x1::endless_account",
        "transfer",
        vec![],
        vec![TransactionArgument::new(&to), TransactionArgument::new(&amount)],
    )
    .unwrap()
}
