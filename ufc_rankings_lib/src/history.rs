//! Append-only CSV history of rankings snapshots.
//!
//! One row per fighter per division per source update. A batch is written
//! only when its `ufc_last_updated` date is not already in the file, so
//! re-running against an unchanged page is a no-op. Existing rows are never
//! rewritten.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RankingsError;
use crate::model::RankingRecord;

/// What [`HistoryStore::append`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// No history existed; the file was created with a header and `rows` rows.
    Created { rows: usize, update: NaiveDate },
    /// `rows` rows were added after the existing ones.
    Appended { rows: usize, update: NaiveDate },
    /// `update` was already recorded; nothing was written.
    Skipped { update: NaiveDate },
}

impl AppendOutcome {
    pub fn rows_written(&self) -> usize {
        match self {
            Self::Created { rows, .. } | Self::Appended { rows, .. } => *rows,
            Self::Skipped { .. } => 0,
        }
    }
}

/// One recorded source update, as listed by the `history` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub ufc_last_updated: NaiveDate,
    /// Date of the run that first recorded this update.
    pub snapshot_date: NaiveDate,
    pub divisions: usize,
    pub rows: usize,
}

#[derive(Deserialize)]
struct StoredUpdate {
    ufc_last_updated: NaiveDate,
}

/// The history file at a fixed path.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file exists and holds at least the header.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }

    /// Every distinct source update date already recorded.
    pub fn update_dates(&self) -> Result<BTreeSet<NaiveDate>, RankingsError> {
        if !self.exists() {
            return Ok(BTreeSet::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut dates = BTreeSet::new();
        for row in reader.deserialize::<StoredUpdate>() {
            dates.insert(row?.ufc_last_updated);
        }
        Ok(dates)
    }

    /// Reads the whole history in file order.
    pub fn load(&self) -> Result<Vec<RankingRecord>, RankingsError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize::<RankingRecord>()
            .map(|row| row.map_err(RankingsError::from))
            .collect()
    }

    /// Per-update row and division counts, oldest update first.
    pub fn summaries(&self) -> Result<Vec<UpdateSummary>, RankingsError> {
        let mut by_update: BTreeMap<NaiveDate, (NaiveDate, BTreeSet<String>, usize)> =
            BTreeMap::new();
        for record in self.load()? {
            let entry = by_update
                .entry(record.ufc_last_updated)
                .or_insert_with(|| (record.snapshot_date, BTreeSet::new(), 0));
            entry.0 = entry.0.min(record.snapshot_date);
            entry.1.insert(record.division);
            entry.2 += 1;
        }
        Ok(by_update
            .into_iter()
            .map(|(update, (snapshot, divisions, rows))| UpdateSummary {
                ufc_last_updated: update,
                snapshot_date: snapshot,
                divisions: divisions.len(),
                rows,
            })
            .collect())
    }

    /// Writes `records` unless their source update date is already recorded.
    ///
    /// All records must share one `ufc_last_updated` date. The new rows are
    /// serialized in full before the file is opened, so a serialization
    /// failure leaves the file untouched.
    pub fn append(&self, records: &[RankingRecord]) -> Result<AppendOutcome, RankingsError> {
        let update = batch_update_date(records)?;

        if !self.exists() {
            let bytes = encode(records, true)?;
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, bytes)?;
            tracing::info!("created {} with {} rows", self.path.display(), records.len());
            return Ok(AppendOutcome::Created {
                rows: records.len(),
                update,
            });
        }

        if self.update_dates()?.contains(&update) {
            tracing::info!("update {} already recorded; skipping", update);
            return Ok(AppendOutcome::Skipped { update });
        }

        let bytes = encode(records, false)?;
        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        file.write_all(&bytes)?;
        file.flush()?;
        tracing::info!(
            "appended {} rows for update {} to {}",
            records.len(),
            update,
            self.path.display()
        );
        Ok(AppendOutcome::Appended {
            rows: records.len(),
            update,
        })
    }
}

fn batch_update_date(records: &[RankingRecord]) -> Result<NaiveDate, RankingsError> {
    let first = records
        .first()
        .ok_or_else(|| RankingsError::Structure("refusing to write an empty batch".into()))?;
    if let Some(other) = records
        .iter()
        .find(|r| r.ufc_last_updated != first.ufc_last_updated)
    {
        return Err(RankingsError::Structure(format!(
            "batch mixes update dates {} and {}",
            first.ufc_last_updated, other.ufc_last_updated
        )));
    }
    Ok(first.ufc_last_updated)
}

fn encode(records: &[RankingRecord], with_header: bool) -> Result<Vec<u8>, RankingsError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.into_inner()
        .map_err(|e| RankingsError::Io(e.into_error()))
}

fn ends_with_newline(file: &mut fs::File) -> Result<bool, RankingsError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
