//! # URL State
//!
//! Query-string state of a page (`?table=4&lang=fr`) with a history stack,
//! so a parameter change can be undone the way the browser's back button
//! would.

use dinetab_core::i18n::{detect_language, Language};
use url::Url;

/// Query parameter carrying the page language.
pub const LANG_PARAM: &str = "lang";

/// Query parameter carrying the table id on the customer page.
pub const TABLE_PARAM: &str = "table";

#[derive(Debug, Clone, PartialEq)]
pub struct UrlState {
    current: Url,
    history: Vec<Url>,
}

impl UrlState {
    pub fn new(url: Url) -> Self {
        UrlState {
            current: url,
            history: Vec::new(),
        }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url)?))
    }

    pub fn url(&self) -> &Url {
        &self.current
    }

    /// First value of `name`, percent-decoded.
    pub fn get(&self, name: &str) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Sets `name` to `value` and pushes the previous URL onto the history.
    ///
    /// The first occurrence keeps its position, later duplicates are dropped;
    /// a new parameter is appended.
    pub fn set(&mut self, name: &str, value: &str) {
        let mut replaced = false;
        let mut pairs: Vec<(String, String)> = Vec::new();
        for (key, existing) in self.current.query_pairs() {
            if key == name {
                if !replaced {
                    pairs.push((key.into_owned(), value.to_string()));
                    replaced = true;
                }
            } else {
                pairs.push((key.into_owned(), existing.into_owned()));
            }
        }
        if !replaced {
            pairs.push((name.to_string(), value.to_string()));
        }
        self.push(pairs);
    }

    /// Drops every occurrence of `name`; no history entry if it was absent.
    pub fn remove(&mut self, name: &str) {
        if self.get(name).is_none() {
            return;
        }
        let pairs = self
            .current
            .query_pairs()
            .filter(|(key, _)| key != name)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        self.push(pairs);
    }

    /// Returns to the previous URL; false when there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Number of entries [`UrlState::back`] can return to.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Page language from `?lang=`, else the browser locale, else English.
    pub fn language(&self, browser_locale: Option<&str>) -> Language {
        detect_language(self.get(LANG_PARAM).as_deref(), browser_locale)
    }

    fn push(&mut self, pairs: Vec<(String, String)>) {
        let mut next = self.current.clone();
        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(pairs);
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }
}

impl std::fmt::Display for UrlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.current.as_str())
    }
}
