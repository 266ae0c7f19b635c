//! Network constants for the Endless SDK.

/// Default REST API base URL (testnet).
pub const DEFAULT_NODE_URL: &str = "https://rpc-test.endless.link/v1";

/// Content type for a BCS-encoded `SignedTransaction` body.
pub const SIGNED_TRANSACTION_CONTENT_TYPE: &str = "application/x.endless.signed_transaction+bcs";

/// Content type for a BCS-encoded `EntryFunction` sent to `/view`.
pub const VIEW_FUNCTION_CONTENT_TYPE: &str = "application/x.endless.view_function+bcs";

/// Content type for JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Seed hashed into the prefix of a single-sender signing message.
pub const RAW_TRANSACTION_SALT: &str = "ENDLESS::RawTransaction";

/// Seed hashed into the prefix of a multi-agent / fee-payer signing message.
pub const RAW_TRANSACTION_WITH_DATA_SALT: &str = "ENDLESS::RawTransactionWithData";

/// Seed hashed into the prefix of the committed transaction hash.
pub const TRANSACTION_SALT: &str = "ENDLESS::Transaction";
