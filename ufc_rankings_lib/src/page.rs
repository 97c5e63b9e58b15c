//! Compiled selectors and patterns for the rankings page layout.

use chrono::NaiveDate;
use regex::Regex;

use crate::error::RankingsError;
use crate::html::Node;
use crate::last_updated;
use crate::model::RankChange;
use crate::rankings::{self, RankingsBatch};

/// CSS selectors for every element the extractors look for.
pub struct Selectors<S> {
    /// Wrapper around the "Last updated" label.
    pub denotions: S,
    pub denotions_text: S,
    /// One per division block; some hold promos rather than rankings.
    pub grouping: S,
    pub table: S,
    pub caption: S,
    pub division: S,
    pub champion: S,
    pub body: S,
    pub row: S,
    pub rank: S,
    pub fighter_link: S,
    pub rank_change: S,
}

impl<S> Selectors<S> {
    pub fn compile<N: Node<Selector = S>>() -> Result<Self, RankingsError> {
        Ok(Self {
            denotions: N::compile("div.list-denotions")?,
            denotions_text: N::compile("p")?,
            grouping: N::compile("div.view-grouping")?,
            table: N::compile("table")?,
            caption: N::compile("caption")?,
            division: N::compile("h4")?,
            champion: N::compile("h5")?,
            body: N::compile("tbody")?,
            row: N::compile("tr")?,
            rank: N::compile("td.views-field-weight-class-rank")?,
            fighter_link: N::compile("td.views-field-title a")?,
            rank_change: N::compile("td.views-field-weight-class-rank-change")?,
        })
    }
}

/// Regexes over squashed element text.
pub struct Patterns {
    /// `Tuesday, Dec. 16` once the label is removed.
    pub last_updated: Regex,
    pub rank_increased: Regex,
    pub rank_decreased: Regex,
}

impl Patterns {
    pub fn compile() -> Result<Self, RankingsError> {
        let build = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| RankingsError::Pattern(format!("regex compile error: {}", e)))
        };
        Ok(Self {
            last_updated: build(
                r"^(?P<weekday>[A-Za-z]+),\s*(?P<month>[A-Za-z]+)\.?\s+(?P<day>\d{1,2})$",
            )?,
            rank_increased: build(r"Rank increased by (\d+)")?,
            rank_decreased: build(r"Rank decreased by (\d+)")?,
        })
    }

    /// Maps rank-change cell text to a [`RankChange`].
    ///
    /// `Rank increased by N` and `Rank decreased by N` may appear anywhere in
    /// the text; `NR` must be the whole text. Anything else is unknown.
    pub fn rank_change(&self, text: &str) -> RankChange {
        let number = |re: &Regex| {
            re.captures(text)
                .and_then(|cap| cap.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        };
        if let Some(n) = number(&self.rank_increased) {
            RankChange::Up(n)
        } else if let Some(n) = number(&self.rank_decreased) {
            RankChange::Down(n)
        } else if text == "NR" {
            RankChange::NotRanked
        } else {
            RankChange::Unknown
        }
    }
}

/// Everything needed to pull a snapshot out of a rankings page.
///
/// Built once per run; the extract methods never mutate it.
pub struct PageParser<S> {
    pub selectors: Selectors<S>,
    pub patterns: Patterns,
    base_url: url::Url,
}

impl<S> PageParser<S> {
    /// Compiles the selectors for node type `N`. Relative fighter links are
    /// resolved against `base_url`.
    pub fn compile<N: Node<Selector = S>>(base_url: &str) -> Result<Self, RankingsError> {
        let base_url = url::Url::parse(base_url)
            .map_err(|e| RankingsError::Config(format!("invalid base url {}: {}", base_url, e)))?;
        Ok(Self {
            selectors: Selectors::compile::<N>()?,
            patterns: Patterns::compile()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// See [`last_updated::extract_last_updated`].
    pub fn last_updated<N: Node<Selector = S>>(
        &self,
        root: N,
        today: NaiveDate,
    ) -> Result<NaiveDate, RankingsError> {
        last_updated::extract_last_updated(root, self, today)
    }

    /// See [`rankings::extract_rankings`].
    pub fn rankings<N: Node<Selector = S>>(
        &self,
        root: N,
        snapshot_date: NaiveDate,
        ufc_last_updated: NaiveDate,
    ) -> Result<RankingsBatch, RankingsError> {
        rankings::extract_rankings(root, self, snapshot_date, ufc_last_updated)
    }
}
