//! Ranking record types written to and read from the history file.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Movement of a fighter since the previous rankings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RankChange {
    Up(u32),
    Down(u32),
    /// Not previously ranked.
    NotRanked,
    /// No movement shown, or text we do not recognise.
    #[default]
    Unknown,
}

impl fmt::Display for RankChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up(n) => write!(f, "+{}", n),
            Self::Down(n) => write!(f, "-{}", n),
            Self::NotRanked => write!(f, "NR"),
            Self::Unknown => Ok(()),
        }
    }
}

impl FromStr for RankChange {
    type Err = String;

    /// Parses the stored form (`+3`, `-1`, `NR`, or empty).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::Unknown);
        }
        if s == "NR" {
            return Ok(Self::NotRanked);
        }
        let parse = |digits: &str| {
            digits
                .parse::<u32>()
                .map_err(|_| format!("invalid rank change: {}", s))
        };
        if let Some(digits) = s.strip_prefix('+') {
            return parse(digits).map(Self::Up);
        }
        if let Some(digits) = s.strip_prefix('-') {
            return parse(digits).map(Self::Down);
        }
        Err(format!("invalid rank change: {}", s))
    }
}

impl Serialize for RankChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RankChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One fighter's standing in one division for one snapshot.
///
/// Field order is the history file's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRecord {
    /// Local date the scrape ran.
    pub snapshot_date: NaiveDate,
    /// Date the site reports the rankings last changed. Dedup key.
    pub ufc_last_updated: NaiveDate,
    pub division: String,
    /// Division champion, repeated on every row of the division.
    pub champion: String,
    pub fighter: String,
    pub fighter_url: String,
    pub rank: u32,
    pub rank_change: RankChange,
}
