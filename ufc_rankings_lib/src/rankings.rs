//! Division tables: one [`RankingRecord`] per ranked fighter.
//!
//! The page holds a run of `div.view-grouping` blocks. Ranking blocks carry a
//! table whose caption names the division (`h4`) and champion (`h5`) and
//! whose body lists the ranked fighters. Blocks and rows that do not have
//! that shape are skipped with a [`SkipReason`], never failed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

use crate::error::RankingsError;
use crate::html::Node;
use crate::model::RankingRecord;
use crate::page::PageParser;

/// Suffix the site appends to pound-for-pound division headings.
pub const DIVISION_SUFFIX: &str = " Top Rank";

/// Why a grouping or row produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoTable,
    NoCaption,
    /// Caption lacks the division heading, the champion heading, or both.
    NoCaptionLabels,
    NoTableBody,
    NoRankCell,
    InvalidRank(String),
    NoFighterLink,
    InvalidFighterUrl(String),
}

impl SkipReason {
    /// Stable key used when counting skips.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoTable => "no_table",
            Self::NoCaption => "no_caption",
            Self::NoCaptionLabels => "no_caption_labels",
            Self::NoTableBody => "no_table_body",
            Self::NoRankCell => "no_rank_cell",
            Self::InvalidRank(_) => "invalid_rank",
            Self::NoFighterLink => "no_fighter_link",
            Self::InvalidFighterUrl(_) => "invalid_fighter_url",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank(raw) => write!(f, "invalid rank {:?}", raw),
            Self::InvalidFighterUrl(href) => write!(f, "invalid fighter url {:?}", href),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Parsed(RankingRecord),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    Parsed {
        division: String,
        champion: String,
        rows: Vec<RowOutcome>,
    },
    Skipped(SkipReason),
}

/// Skip counts for one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipReport {
    pub groupings_skipped: usize,
    pub rows_skipped: usize,
    pub by_reason: BTreeMap<&'static str, usize>,
}

impl SkipReport {
    fn record_grouping(&mut self, reason: &SkipReason) {
        self.groupings_skipped += 1;
        *self.by_reason.entry(reason.label()).or_default() += 1;
    }

    fn record_row(&mut self, reason: &SkipReason) {
        self.rows_skipped += 1;
        *self.by_reason.entry(reason.label()).or_default() += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.groupings_skipped == 0 && self.rows_skipped == 0
    }
}

/// All records from one page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingsBatch {
    pub records: Vec<RankingRecord>,
    pub skips: SkipReport,
}

impl RankingsBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn division_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.division.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// The source update date shared by every record.
    pub fn ufc_last_updated(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.ufc_last_updated)
    }
}

/// Extracts every ranked fighter on the page.
///
/// Fails with a structural error only when nothing at all was extracted.
pub fn extract_rankings<N: Node>(
    root: N,
    parser: &PageParser<N::Selector>,
    snapshot_date: NaiveDate,
    ufc_last_updated: NaiveDate,
) -> Result<RankingsBatch, RankingsError> {
    let mut records = Vec::new();
    let mut skips = SkipReport::default();

    for (index, grouping) in root.all(&parser.selectors.grouping).into_iter().enumerate() {
        match extract_grouping(grouping, parser, snapshot_date, ufc_last_updated) {
            GroupOutcome::Skipped(reason) => {
                tracing::debug!("skipping grouping #{}: {}", index, reason);
                skips.record_grouping(&reason);
            }
            GroupOutcome::Parsed { division, rows, .. } => {
                for row in rows {
                    match row {
                        RowOutcome::Parsed(record) => records.push(record),
                        RowOutcome::Skipped(reason) => {
                            tracing::debug!("skipping row in {}: {}", division, reason);
                            skips.record_row(&reason);
                        }
                    }
                }
            }
        }
    }

    if records.is_empty() {
        return Err(RankingsError::Structure(
            "parsed 0 rows; page structure may have changed".into(),
        ));
    }

    if !skips.is_empty() {
        tracing::warn!(
            "skipped {} groupings and {} rows: {:?}",
            skips.groupings_skipped,
            skips.rows_skipped,
            skips.by_reason
        );
    }

    Ok(RankingsBatch { records, skips })
}

/// Extracts one `view-grouping` block.
pub fn extract_grouping<N: Node>(
    grouping: N,
    parser: &PageParser<N::Selector>,
    snapshot_date: NaiveDate,
    ufc_last_updated: NaiveDate,
) -> GroupOutcome {
    let sel = &parser.selectors;
    let Some(table) = grouping.first(&sel.table) else {
        return GroupOutcome::Skipped(SkipReason::NoTable);
    };
    let Some(caption) = table.first(&sel.caption) else {
        return GroupOutcome::Skipped(SkipReason::NoCaption);
    };
    let (Some(division), Some(champion)) =
        (caption.first(&sel.division), caption.first(&sel.champion))
    else {
        return GroupOutcome::Skipped(SkipReason::NoCaptionLabels);
    };
    let Some(body) = table.first(&sel.body) else {
        return GroupOutcome::Skipped(SkipReason::NoTableBody);
    };

    let division = normalize_division(&division.squashed_text());
    let champion = champion.squashed_text();

    let rows = body
        .all(&sel.row)
        .into_iter()
        .map(|row| {
            extract_row(row, parser, &division, &champion, snapshot_date, ufc_last_updated)
        })
        .collect();

    GroupOutcome::Parsed {
        division,
        champion,
        rows,
    }
}

/// Extracts one `<tr>` of a division table.
pub fn extract_row<N: Node>(
    row: N,
    parser: &PageParser<N::Selector>,
    division: &str,
    champion: &str,
    snapshot_date: NaiveDate,
    ufc_last_updated: NaiveDate,
) -> RowOutcome {
    let sel = &parser.selectors;
    let Some(rank_cell) = row.first(&sel.rank) else {
        return RowOutcome::Skipped(SkipReason::NoRankCell);
    };
    let rank_text = rank_cell.squashed_text();
    let rank = match rank_text.parse::<u32>() {
        Ok(rank) if rank > 0 => rank,
        _ => return RowOutcome::Skipped(SkipReason::InvalidRank(rank_text)),
    };

    let Some(link) = row.first(&sel.fighter_link) else {
        return RowOutcome::Skipped(SkipReason::NoFighterLink);
    };
    let href = link.attribute("href").unwrap_or_default();
    let fighter_url = match parser.base_url().join(&href) {
        Ok(url) => url.to_string(),
        Err(_) => return RowOutcome::Skipped(SkipReason::InvalidFighterUrl(href)),
    };

    let rank_change = row
        .first(&sel.rank_change)
        .map(|cell| parser.patterns.rank_change(&cell.squashed_text()))
        .unwrap_or_default();

    RowOutcome::Parsed(RankingRecord {
        snapshot_date,
        ufc_last_updated,
        division: division.to_string(),
        champion: champion.to_string(),
        fighter: link.squashed_text(),
        fighter_url,
        rank,
        rank_change,
    })
}

/// Drops the pound-for-pound `Top Rank` suffix from a division heading.
pub fn normalize_division(heading: &str) -> String {
    heading
        .strip_suffix(DIVISION_SUFFIX)
        .unwrap_or(heading)
        .to_string()
}
