//! Error types for the rankings HTTP client.

/// Errors that can occur when fetching the rankings page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The URL built from the base URL and path was not valid.
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Connection, timeout, or body read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status and a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}

impl Error {
    /// Returns true when the failure happened before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
