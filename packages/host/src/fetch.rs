//! Template source fetching.
//!
//! Fetching goes through a trait so tests can substitute canned responses
//! instead of real network calls.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

/// Fetches template source text from a URL.
#[async_trait]
pub trait TemplateFetcher: Send + Sync {
    /// Fetch the body at `url`.
    ///
    /// A non-success status is an error; the loader treats a failed source
    /// as contributing nothing rather than aborting the whole load.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// Production fetcher using reqwest.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Fetch {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl TemplateFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: format!("status {}", response.status()),
            });
        }

        response.text().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory fetcher serving canned bodies, for tests and offline use.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the body served for `url`.
    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.bodies.insert(url.into(), body.into());
    }
}

#[async_trait]
impl TemplateFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Fetch {
                url: url.to_string(),
                message: "no body registered".to_string(),
            })
    }
}
