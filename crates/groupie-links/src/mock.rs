//! Mock fetcher for testing.
//!
//! Provides [`MockFetcher`] for exercising resolution without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::{FetchError, Fetched, LinkFetcher};

/// In-memory fetcher.
///
/// Unknown URLs fail as if the host were unreachable. Every call is counted
/// so tests can check how often a URL was requested.
///
/// # Example
///
/// ```
/// use groupie_links::{LinkFetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_json("http://api.test/dates/1", r#"{"dates": ["*23-08-2019"]}"#)
///     .with_status("http://api.test/gone", 404);
///
/// assert!(fetcher.fetch("http://api.test/gone").is_err());
/// assert_eq!(fetcher.calls("http://api.test/gone"), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, Result<Fetched, u16>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockFetcher {
    /// Create a fetcher that knows no URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with an `application/json` content type.
    #[must_use]
    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with_body(url, Some("application/json; charset=utf-8"), body)
    }

    /// Serve `body` with the given content type (or none).
    #[must_use]
    pub fn with_body(mut self, url: &str, content_type: Option<&str>, body: &str) -> Self {
        self.responses.insert(
            url.to_owned(),
            Ok(Fetched {
                content_type: content_type.map(str::to_owned),
                body: body.to_owned(),
            }),
        );
        self
    }

    /// Answer `url` with a non-success status.
    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_owned(), Err(status));
        self
    }

    /// How many times `url` was fetched.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total number of fetches.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

impl LinkFetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Fetched, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default() += 1;

        match self.responses.get(url) {
            Some(Ok(fetched)) => Ok(fetched.clone()),
            Some(Err(status)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Http(format!("{url}: connection refused"))),
        }
    }
}
