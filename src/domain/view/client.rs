//! View sub-client.

use crate::bcs;
use crate::client::EndlessClient;
use crate::error::SdkError;
use crate::http::Transport;
use crate::network::VIEW_FUNCTION_CONTENT_TYPE;
use crate::transaction::EntryFunction;

/// Sub-client for view function calls.
pub struct View<'a, T: Transport> {
    pub(crate) client: &'a EndlessClient<T>,
}

impl<'a, T: Transport> View<'a, T> {
    /// `POST /view` with the BCS-encoded function call. Returns one JSON value
    /// per Move return value.
    ///
    /// Without `ledger_version` the node evaluates at its latest version. A
    /// version the node has pruned comes back as an HTTP error (410).
    pub async fn bcs_payload(
        &self,
        function: &EntryFunction,
        ledger_version: Option<u64>,
    ) -> Result<Vec<serde_json::Value>, SdkError> {
        let mut params = Vec::new();
        if let Some(v) = ledger_version {
            params.push(("ledger_version", v.to_string()));
        }
        let resp = self
            .client
            .transport
            .post(
                "/view",
                &params,
                bcs::to_bytes(function),
                VIEW_FUNCTION_CONTENT_TYPE,
            )
            .await?
            .error_for_status()?;
        tracing::debug!(
            module = %function.module,
            function = %function.function,
            "View function evaluated"
        );
        Ok(resp.json()?)
    }
}
