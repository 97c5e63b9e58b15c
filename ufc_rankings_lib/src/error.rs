//! Error types for the library layer.

use thiserror::Error;

/// Every failure that can end an update run.
///
/// None of these are retried. A failed run writes nothing, so the next
/// scheduled run starts from scratch.
#[derive(Error, Debug)]
pub enum RankingsError {
    /// Connection, timeout, or non-success status while fetching the page.
    #[error("fetch failed: {0}")]
    Fetch(#[from] ufc_rankings_api::Error),
    /// An expected element is missing; the page layout has likely changed.
    #[error("page structure error: {0}")]
    Structure(String),
    /// The last-updated label did not match `Weekday, Mon. D`.
    #[error("date parse error: {0}")]
    DateParse(String),
    /// Too few rows to trust the parse.
    #[error("parsed only {rows} rows (minimum {min}); page structure may have changed")]
    BelowThreshold { rows: usize, min: usize },
    /// Two rows in one division carry the same rank.
    #[error("duplicate rank {rank} in division {division}")]
    DuplicateRank { division: String, rank: u32 },
    /// A configured value (such as the base URL) is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A CSS selector or regex failed to compile.
    #[error("pattern error: {0}")]
    Pattern(String),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankingsError {
    /// True for errors that signal an upstream layout change.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Structure(_) | Self::BelowThreshold { .. } | Self::DuplicateRank { .. }
        )
    }
}
