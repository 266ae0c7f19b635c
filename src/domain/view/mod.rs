//! View domain: read-only Move function calls.
//!
//! View results are returned as the node renders them; callers decode the
//! values they expect (see [`Accounts::balance`](crate::domain::account::client::Accounts::balance)).

pub mod client;
