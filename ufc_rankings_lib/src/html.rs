//! Minimal query surface over a parsed HTML document.
//!
//! The extractors only need to find descendants, read squashed text and read
//! attributes, so they are written against [`Node`] rather than a particular
//! HTML library. [`Document`] and the `ElementRef` impl back it with
//! `scraper`.

use scraper::{ElementRef, Html, Selector};

use crate::error::RankingsError;

/// An element handle that can be queried for descendants, text and attributes.
pub trait Node: Copy {
    /// Compiled form of a CSS selector.
    type Selector;

    fn compile(css: &str) -> Result<Self::Selector, RankingsError>;

    /// First descendant matching `selector`, in document order.
    fn first(&self, selector: &Self::Selector) -> Option<Self>;

    /// All descendants matching `selector`, in document order.
    fn all(&self, selector: &Self::Selector) -> Vec<Self>;

    /// Descendant text with every run of whitespace collapsed to one space
    /// and the ends trimmed.
    fn squashed_text(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;
}

impl<'a> Node for ElementRef<'a> {
    type Selector = Selector;

    fn compile(css: &str) -> Result<Selector, RankingsError> {
        Selector::parse(css)
            .map_err(|e| RankingsError::Pattern(format!("invalid CSS selector '{}': {}", css, e)))
    }

    fn first(&self, selector: &Selector) -> Option<Self> {
        self.select(selector).next()
    }

    fn all(&self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn squashed_text(&self) -> String {
        self.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Collapses all whitespace runs (newlines and tabs included) to single
/// spaces and trims the ends.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed rankings page.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The `<html>` element; every query starts here.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}
