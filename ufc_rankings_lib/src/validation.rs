//! Batch-level sanity checks run before anything touches the history file.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::RankingsError;
use crate::model::RankingRecord;
use crate::rankings::RankingsBatch;

/// Rejects a batch smaller than `min_rows`; a short parse means the layout
/// broke, not that the rankings shrank.
pub fn check_row_count(batch: &RankingsBatch, min_rows: usize) -> Result<(), RankingsError> {
    if batch.len() < min_rows {
        return Err(RankingsError::BelowThreshold {
            rows: batch.len(),
            min: min_rows,
        });
    }
    Ok(())
}

/// Rejects a batch where one division lists the same rank twice.
pub fn check_unique_ranks(records: &[RankingRecord]) -> Result<(), RankingsError> {
    let mut seen: BTreeSet<(&str, u32)> = BTreeSet::new();
    for record in records {
        if !seen.insert((record.division.as_str(), record.rank)) {
            return Err(RankingsError::DuplicateRank {
                division: record.division.clone(),
                rank: record.rank,
            });
        }
    }
    Ok(())
}

/// Divisions whose ranks are not exactly `1..=N`, with the missing ranks.
pub fn rank_gaps(records: &[RankingRecord]) -> BTreeMap<String, Vec<u32>> {
    let mut by_division: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    for record in records {
        by_division
            .entry(record.division.as_str())
            .or_default()
            .insert(record.rank);
    }

    by_division
        .into_iter()
        .filter_map(|(division, ranks)| {
            let max = ranks.iter().next_back().copied().unwrap_or(0);
            let missing: Vec<u32> = (1..=max).filter(|r| !ranks.contains(r)).collect();
            (!missing.is_empty()).then(|| (division.to_string(), missing))
        })
        .collect()
}

/// Every check a batch must pass before it may be written.
///
/// Gaps in a division's ranks are logged but allowed.
pub fn validate_batch(batch: &RankingsBatch, min_rows: usize) -> Result<(), RankingsError> {
    check_row_count(batch, min_rows)?;
    check_unique_ranks(&batch.records)?;
    for (division, missing) in rank_gaps(&batch.records) {
        tracing::warn!("{} is missing ranks {:?}", division, missing);
    }
    Ok(())
}
