//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: domain types
//! - `wire.rs`: raw serde structs matching node responses
//! - `convert.rs`: `From` conversions wire → domain
//! - `client.rs`: sub-client with the REST calls for the domain

pub mod account;
pub mod ledger;
pub mod transaction;
pub mod view;
