//! Transport layer: the [`Transport`] collaborator and, with the `http`
//! feature, `EndlessHttp` with per-method retry policies.

#[cfg(feature = "http")]
pub mod client;
pub mod retry;
pub mod transport;

#[cfg(feature = "http")]
pub use client::EndlessHttp;
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::{HttpResponse, QueryParams, Transport};
