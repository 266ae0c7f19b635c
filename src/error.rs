//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("BCS error: {0}")]
    Bcs(#[from] BcsError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Authenticator parties do not match the declared signing topology.
    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The signing collaborator failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node refused the transaction at submission (4xx).
    #[error("Transaction rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Confirmation was not observed within the polling budget.
    #[error("Transaction {hash} not confirmed after {attempts} polls")]
    Timeout { hash: String, attempts: u32 },

    /// The transaction was committed but did not execute successfully.
    #[error("Transaction {hash} failed: {vm_status}")]
    ExecutionFailed { hash: String, vm_status: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcsError {
    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    /// Bad discriminant, bad option tag, malformed ULEB128, bad UTF-8, trailing bytes.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

impl BcsError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        BcsError::InvalidEncoding(msg.into())
    }
}

/// Errors from parsing textual addresses and type tags.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("Unterminated '<' opened at position {position}")]
    UnterminatedGenerics { position: usize },

    #[error("Unbalanced '{ch}' at position {position}")]
    UnbalancedBracket { ch: char, position: usize },

    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("Expected `address::module::name`, got `{0}`")]
    InvalidPath(String),

    #[error("Generics nested deeper than {max} levels at position {position}")]
    NestingTooDeep { position: usize, max: usize },

    #[error("Invalid unsigned integer `{0}`")]
    InvalidNumber(String),

    #[error("Unknown type `{0}`")]
    UnknownType(String),

    #[error("`{name}` takes {expected} type argument(s), got {actual}")]
    WrongArity {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request ({status}): {body}")]
    BadRequest { status: u16, body: String },

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}
