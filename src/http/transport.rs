//! The transport collaborator: raw requests against the node's REST API.

use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Status and body of one REST call, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Map any status >= 400 to an [`HttpError`].
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.status < 400 {
            return Ok(self);
        }
        Err(match self.status {
            401 => HttpError::Unauthorized,
            404 => HttpError::NotFound(self.body),
            429 => HttpError::RateLimited {
                retry_after_ms: None,
            },
            400..=499 => HttpError::BadRequest {
                status: self.status,
                body: self.body,
            },
            status => HttpError::ServerError {
                status,
                body: self.body,
            },
        })
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Query parameters, in order.
pub type QueryParams<'a> = &'a [(&'a str, String)];

/// Moves opaque bytes to and from the node.
///
/// Paths are relative to the node's base URL (`/transactions`,
/// `/accounts/0x1`). Implementations return every HTTP status as an
/// [`HttpResponse`]; only failures to obtain a response at all are errors.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, path: &str, params: QueryParams<'_>) -> Result<HttpResponse, HttpError>;

    async fn post(
        &self,
        path: &str,
        params: QueryParams<'_>,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse, HttpError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    async fn get(&self, path: &str, params: QueryParams<'_>) -> Result<HttpResponse, HttpError> {
        (**self).get(path, params).await
    }

    async fn post(
        &self,
        path: &str,
        params: QueryParams<'_>,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse, HttpError> {
        (**self).post(path, params, body, content_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_for_status_classification() {
        assert!(HttpResponse::new(202, "{}").error_for_status().is_ok());
        assert!(matches!(
            HttpResponse::new(404, "gone").error_for_status(),
            Err(HttpError::NotFound(body)) if body == "gone"
        ));
        assert!(matches!(
            HttpResponse::new(400, "bad").error_for_status(),
            Err(HttpError::BadRequest { status: 400, .. })
        ));
        assert!(matches!(
            HttpResponse::new(401, "").error_for_status(),
            Err(HttpError::Unauthorized)
        ));
        assert!(matches!(
            HttpResponse::new(429, "").error_for_status(),
            Err(HttpError::RateLimited { .. })
        ));
        assert!(matches!(
            HttpResponse::new(503, "down").error_for_status(),
            Err(HttpError::ServerError { status: 503, .. })
        ));
    }

    #[test]
    fn test_json_body() {
        let response = HttpResponse::new(200, r#"{"chain_id":4}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["chain_id"], 4);
    }
}
