//! HTTP fetching behind a trait so resolution can run without a network.

use std::io::Read;
use std::time::Duration;

use ureq::Agent;

/// Default cap on how much of a response body is read.
///
/// Longer bodies are cut at this length instead of failing; displayed text is
/// truncated far earlier anyway.
pub const MAX_BODY_BYTES: u64 = 16 * 1024 * 1024;

/// Successful response of a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// Response body decoded as text.
    pub body: String,
}

impl Fetched {
    /// Whether the response declares a JSON body.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("HTTP error: {0}")]
    Http(String),
    /// Server answered with a non-success status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// Body could not be read.
    #[error("cannot read body: {0}")]
    Body(String),
    /// Body declared as JSON does not parse.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Blocking GET of a URL.
pub trait LinkFetcher: Send + Sync {
    /// Fetch `url`. Non-2xx responses are errors.
    fn fetch(&self, url: &str) -> Result<Fetched, FetchError>;
}

/// Create HTTP agent with the specified timeout.
///
/// Status codes are not turned into transport errors so the caller can
/// report them as [`FetchError::Status`].
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// [`LinkFetcher`] backed by a pooled `ureq` agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: Agent,
    body_limit: u64,
}

impl HttpFetcher {
    /// Fetcher whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            body_limit: MAX_BODY_BYTES,
        }
    }

    /// Read at most `limit` bytes of each body.
    #[must_use]
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}

impl LinkFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        let response = self
            .agent
            .get(url)
            .header("Accept", "application/json, text/plain;q=0.9, */*;q=0.8")
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .take(self.body_limit)
            .read_to_end(&mut bytes)
            .map_err(|e| FetchError::Body(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(Fetched { content_type, body })
    }
}
