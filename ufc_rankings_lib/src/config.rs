//! Run configuration shared by every stage of an update.

use std::path::PathBuf;
use std::time::Duration;

use ufc_rankings_api::{DEFAULT_BASE_URL, DEFAULT_RANKINGS_PATH, DEFAULT_TIMEOUT};

/// Default location of the append-only history file.
pub const DEFAULT_HISTORY_PATH: &str = "ufc_rankings_history.csv";

/// Minimum rows a parse must yield before anything is written.
/// The live page carries eleven or more tables of fifteen.
pub const DEFAULT_MIN_ROWS: usize = 150;

/// History file header, in column order.
pub const COLUMNS: [&str; 8] = [
    "snapshot_date",
    "ufc_last_updated",
    "division",
    "champion",
    "fighter",
    "fighter_url",
    "rank",
    "rank_change",
];

/// Immutable settings for one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingsConfig {
    /// Site root; also the base for resolving relative fighter links.
    pub base_url: String,
    pub rankings_path: String,
    pub history_path: PathBuf,
    pub min_rows: usize,
    pub timeout: Duration,
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            rankings_path: DEFAULT_RANKINGS_PATH.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            min_rows: DEFAULT_MIN_ROWS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RankingsConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the rankings page.
    pub fn rankings_url(&self) -> String {
        format!("{}{}", self.base_url, self.rankings_path)
    }

    /// Builds the HTTP client this configuration describes.
    pub fn client(&self) -> ufc_rankings_api::Client {
        ufc_rankings_api::Client::with_base_url(&self.base_url).with_timeout(self.timeout)
    }
}
