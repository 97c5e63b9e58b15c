//! The page's "Last updated" label, resolved to a calendar date.

use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate, Weekday};

use crate::error::RankingsError;
use crate::html::{squash_whitespace, Node};
use crate::page::{PageParser, Patterns};

/// Text that precedes the date inside the label.
pub const LABEL_PREFIX: &str = "Last updated:";

/// Finds the label on the page and resolves it against `today`.
///
/// A missing wrapper or missing text element is a structural error: the
/// page layout has changed.
pub fn extract_last_updated<N: Node>(
    root: N,
    parser: &PageParser<N::Selector>,
    today: NaiveDate,
) -> Result<NaiveDate, RankingsError> {
    let wrapper = root.first(&parser.selectors.denotions).ok_or_else(|| {
        RankingsError::Structure("could not find last-updated block (list-denotions)".into())
    })?;
    let text = wrapper
        .first(&parser.selectors.denotions_text)
        .ok_or_else(|| RankingsError::Structure("could not find last-updated <p> tag".into()))?;

    let date = resolve_last_updated(&text.squashed_text(), &parser.patterns, today)?;
    tracing::debug!("last updated label resolved to {}", date);
    Ok(date)
}

/// Resolves label text such as `Last updated: Tuesday, Dec. 16`.
///
/// The label has no year. The current year is assumed; if that puts the
/// date after `today`, the previous year is used instead (a January run
/// reading a December update).
pub fn resolve_last_updated(
    raw: &str,
    patterns: &Patterns,
    today: NaiveDate,
) -> Result<NaiveDate, RankingsError> {
    let clean = squash_whitespace(raw);
    let text = clean.replace(LABEL_PREFIX, "");
    let text = text.trim();

    let cap = patterns
        .last_updated
        .captures(text)
        .ok_or_else(|| RankingsError::DateParse(format!("unrecognised date text: {:?}", text)))?;

    Weekday::from_str(&cap["weekday"])
        .map_err(|_| RankingsError::DateParse(format!("invalid weekday in {:?}", text)))?;
    let month = parse_month(&cap["month"])
        .ok_or_else(|| RankingsError::DateParse(format!("invalid month in {:?}", text)))?;
    let day: u32 = cap["day"]
        .parse()
        .map_err(|_| RankingsError::DateParse(format!("invalid day in {:?}", text)))?;

    let year = today.year();
    let date = match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        // Feb. 29 read in a non-leap year can only be last year's.
        None => NaiveDate::from_ymd_opt(year - 1, month, day).ok_or_else(|| {
            RankingsError::DateParse(format!("no such date: {} {} in {}", month, day, year))
        })?,
    };

    if date > today {
        return date.with_year(date.year() - 1).ok_or_else(|| {
            RankingsError::DateParse(format!("no such date: {} {} in {}", month, day, year - 1))
        });
    }
    Ok(date)
}

fn parse_month(token: &str) -> Option<u32> {
    if token.eq_ignore_ascii_case("sept") {
        return Some(9);
    }
    Month::from_str(token).ok().map(|m| m.number_from_month())
}
