//! Conversions: account wire types → domain types.

use crate::domain::account::wire::{AccountResponse, AuthenticationKeys};
use crate::domain::account::AccountInfo;

impl From<AuthenticationKeys> for Vec<String> {
    fn from(keys: AuthenticationKeys) -> Self {
        match keys {
            AuthenticationKeys::Single(key) => vec![key],
            AuthenticationKeys::Many(keys) => keys,
        }
    }
}

impl From<AccountResponse> for AccountInfo {
    fn from(w: AccountResponse) -> Self {
        Self {
            sequence_number: w.sequence_number,
            authentication_keys: w.authentication_key.into(),
        }
    }
}
