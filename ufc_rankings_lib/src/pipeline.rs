//! One update run: fetch, extract, validate, then append if new.

use chrono::NaiveDate;
use scraper::ElementRef;

use crate::config::RankingsConfig;
use crate::error::RankingsError;
use crate::history::{AppendOutcome, HistoryStore};
use crate::html::Document;
use crate::page::PageParser;
use crate::rankings::{RankingsBatch, SkipReport};
use crate::validation;

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub snapshot_date: NaiveDate,
    pub ufc_last_updated: NaiveDate,
    pub rows: usize,
    pub divisions: usize,
    pub skips: SkipReport,
    /// `None` for a dry run.
    pub outcome: Option<AppendOutcome>,
}

/// Fetches the rankings page and parses it into a document.
pub async fn fetch_document(config: &RankingsConfig) -> Result<Document, RankingsError> {
    tracing::info!("fetching {}", config.rankings_url());
    let body = config.client().get_html(&config.rankings_path).await?;
    Ok(Document::parse(&body))
}

/// Pulls the last-updated date and every ranking row out of `doc`.
pub fn extract_snapshot(
    doc: &Document,
    config: &RankingsConfig,
    today: NaiveDate,
) -> Result<RankingsBatch, RankingsError> {
    let parser = PageParser::compile::<ElementRef>(&config.base_url)?;
    let ufc_last_updated = parser.last_updated(doc.root(), today)?;
    parser.rankings(doc.root(), today, ufc_last_updated)
}

/// Extracts, validates and (unless `dry_run`) records a fetched document.
///
/// Nothing is written if any step fails.
pub fn process_document(
    doc: &Document,
    config: &RankingsConfig,
    today: NaiveDate,
    dry_run: bool,
) -> Result<UpdateReport, RankingsError> {
    let batch = extract_snapshot(doc, config, today)?;
    let ufc_last_updated = batch
        .ufc_last_updated()
        .ok_or_else(|| RankingsError::Structure("parsed 0 rows".into()))?;
    tracing::info!(
        "parsed {} rows, {} divisions, UFC updated {}",
        batch.len(),
        batch.division_count(),
        ufc_last_updated
    );

    validation::validate_batch(&batch, config.min_rows)?;

    let outcome = if dry_run {
        None
    } else {
        Some(HistoryStore::new(&config.history_path).append(&batch.records)?)
    };

    Ok(UpdateReport {
        snapshot_date: today,
        ufc_last_updated,
        rows: batch.len(),
        divisions: batch.division_count(),
        skips: batch.skips,
        outcome,
    })
}

/// Runs the whole update against the live (or configured) site.
///
/// `today` is both the snapshot date and the reference for resolving the
/// year-less last-updated label.
pub async fn run_update(
    config: &RankingsConfig,
    today: NaiveDate,
    dry_run: bool,
) -> Result<UpdateReport, RankingsError> {
    let doc = fetch_document(config).await?;
    process_document(&doc, config, today, dry_run)
}
