use std::time::Instant;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::RadarrConfig;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("API returned {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("API key contains invalid characters (non-visible ASCII)")]
    InvalidApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Status and body of a successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        if self.body.trim().is_empty() {
            return serde_json::from_value(serde_json::Value::Null);
        }
        serde_json::from_str(&self.body)
    }
}

/// HTTP transport for one Radarr server.
///
/// Wraps [`reqwest::Client`] with the base URL derived from
/// [`RadarrConfig`]. The API key rides along as the `X-Api-Key` header on
/// every request and the configured timeout applies per request.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl HttpClient {
    pub fn new(config: &RadarrConfig) -> Result<Self, TransportError> {
        let base_url = config.base_url();
        // Parse once up front so a bad host fails here rather than per request.
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(config.api_key()).map_err(|_| TransportError::InvalidApiKey)?,
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(TransportError::Client)?;

        Ok(Self {
            inner,
            base_url,
            timeout_seconds: config.timeout_seconds(),
        })
    }

    /// Full URL for `path` and `query`. A missing leading `/` on `path` is added.
    pub fn url_for(&self, path: &str, query: &[(&str, String)]) -> Result<Url, TransportError> {
        let sep = if path.starts_with('/') { "" } else { "/" };
        let mut url = Url::parse(&format!("{}{sep}{path}", self.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send a single request. No retries.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url_for(path, query)?;
        let mut req = self.inner.request(method.clone(), url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let started = Instant::now();
        let resp = req.send().await.map_err(|e| self.classify(e))?;
        let status = resp.status();
        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "radarr request"
        );

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Return the base URL, e.g. `http://localhost:7878/radarr`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else {
            TransportError::Network(err)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
