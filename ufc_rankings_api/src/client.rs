//! HTTP client for the UFC rankings site.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Production site root. Relative fighter links resolve against this.
pub const DEFAULT_BASE_URL: &str = "https://www.ufc.com";
/// Path of the rankings page below the site root.
pub const DEFAULT_RANKINGS_PATH: &str = "/rankings";
/// Upper bound on a single request, connect through body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the rankings site.
///
/// Sends a single GET per call with browser-like headers. There are no
/// retries; each call builds a fresh `reqwest::Client` with the configured
/// timeout.
#[derive(Debug, Clone)]
pub struct Client {
    /// Site root. Defaults to `https://www.ufc.com`.
    base_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a client pointing at the production site.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|source| {
            tracing::error!("Invalid URL constructed: {}", source);
            Error::InvalidUrl { url: raw, source }
        })
    }

    /// Fetches `path` below the base URL and returns the response body.
    ///
    /// Fails with [`Error::Network`] when the connection cannot be made or
    /// times out, and with [`Error::HttpStatus`] on any non-2xx status.
    pub async fn get_html(&self, path: &str) -> Result<String, Error> {
        let url = self.get_url(path)?;
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })?;

        tracing::debug!("GET {}", url);
        let resp = client
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Network(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    /// Fetches the rankings page at its default path.
    pub async fn get_rankings(&self) -> Result<String, Error> {
        self.get_html(DEFAULT_RANKINGS_PATH).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
