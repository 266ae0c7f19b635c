//! reqwest-backed [`Transport`]: `EndlessHttp`.

use std::time::Duration;

use reqwest::Client;

use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::http::transport::{HttpResponse, QueryParams, Transport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for an Endless node's REST API.
///
/// Reads are retried per `read_retry`; posts are sent exactly once.
#[derive(Clone)]
pub struct EndlessHttp {
    base_url: String,
    client: Client,
    read_retry: RetryPolicy,
}

impl EndlessHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            read_retry: RetryPolicy::Idempotent,
        })
    }

    /// Replace the retry policy used for GET requests.
    pub fn read_retry(mut self, policy: RetryPolicy) -> Self {
        self.read_retry = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: QueryParams<'_>) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{}?{}", url, query);
        }
        url
    }

    async fn request_with_retry(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<(&[u8], &str)>,
        retry: &RetryPolicy,
    ) -> Result<HttpResponse, HttpError> {
        let Some(config) = retry.config() else {
            return self.do_request(&method, url, body).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request(&method, url, body).await {
                Ok(resp) if !config.is_retryable_status(resp.status) => return Ok(resp),
                Ok(resp) => {
                    if attempt == config.max_retries {
                        return Ok(resp);
                    }
                    last_error = Some(format!("status {}: {}", resp.status, resp.body));
                }
                Err(HttpError::Reqwest(e)) if e.is_connect() || e.is_timeout() || e.is_request() => {
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }

            if attempt < config.max_retries {
                let delay = config.delay_for_attempt(attempt);
                tracing::debug!(
                    attempt = attempt + 1,
                    max = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying request to {}",
                    url
                );
                futures_timer::Delay::new(delay).await;
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error.unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<(&[u8], &str)>,
    ) -> Result<HttpResponse, HttpError> {
        let mut req = self
            .client
            .request(method.clone(), url)
            .header(reqwest::header::ACCEPT, crate::network::JSON_CONTENT_TYPE);

        if let Some((bytes, content_type)) = body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes.to_vec());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for EndlessHttp {
    async fn get(&self, path: &str, params: QueryParams<'_>) -> Result<HttpResponse, HttpError> {
        let url = self.url(path, params);
        self.request_with_retry(reqwest::Method::GET, &url, None, &self.read_retry)
            .await
    }

    async fn post(
        &self,
        path: &str,
        params: QueryParams<'_>,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url(path, params);
        self.request_with_retry(
            reqwest::Method::POST,
            &url,
            Some((body.as_slice(), content_type)),
            &RetryPolicy::None,
        )
        .await
    }
}

impl std::fmt::Debug for EndlessHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndlessHttp")
            .field("base_url", &self.base_url)
            .field("read_retry", &self.read_retry)
            .finish()
    }
}
