//! Library layer for the UFC rankings tracker.
//!
//! Fetches the rankings page through `ufc_rankings_api`, extracts one record
//! per ranked fighter, and appends each new source update to a CSV history.

pub mod config;
pub mod error;
pub mod history;
pub mod html;
pub mod last_updated;
pub mod model;
pub mod page;
pub mod pipeline;
pub mod rankings;
pub mod validation;

pub use ufc_rankings_api;

pub use config::{RankingsConfig, COLUMNS, DEFAULT_HISTORY_PATH, DEFAULT_MIN_ROWS};
pub use error::RankingsError;
pub use history::{AppendOutcome, HistoryStore, UpdateSummary};
pub use model::{RankChange, RankingRecord};
pub use pipeline::{run_update, UpdateReport};
pub use rankings::{RankingsBatch, SkipReport};
