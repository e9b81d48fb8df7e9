//! Filter pills for card search.
//!
//! A [`FilterSet`] is an ordered list of AND/OR/NOT clauses over named card
//! attributes. Field and value are opaque strings matched by the backend
//! against its indexed attributes; nothing is validated locally.
//!
//! # Example
//!
//! ```rust
//! use tcg_companion::filters::{FilterKind, FilterSet};
//!
//! let mut filters = FilterSet::new();
//! filters.add(FilterKind::And, "color", "R", "Color: Red");
//! filters.add(FilterKind::Not, "rarity", "common", "Not common");
//! assert_eq!(
//!     filters.to_query_pairs(),
//!     vec![
//!         ("and_color".to_string(), "R".to_string()),
//!         ("not_rarity".to_string(), "common".to_string()),
//!     ]
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompanionError;

// ---------------------------------------------------------------------------
// FilterKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    And,
    Or,
    Not,
}

impl FilterKind {
    /// Query-string prefix for clauses of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            FilterKind::And => "and",
            FilterKind::Or => "or",
            FilterKind::Not => "not",
        }
    }

    /// Display order of the groups: OR, then AND, then NOT.
    pub const DISPLAY_ORDER: [FilterKind; 3] = [FilterKind::Or, FilterKind::And, FilterKind::Not];
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix().to_uppercase())
    }
}

impl FromStr for FilterKind {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(FilterKind::And),
            "or" => Ok(FilterKind::Or),
            "not" => Ok(FilterKind::Not),
            other => Err(CompanionError::InvalidArgument(format!(
                "Unknown filter kind: {}",
                other
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterClause
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub kind: FilterKind,
    pub field: String,
    pub value: String,
    pub display_text: String,
}

impl FilterClause {
    fn matches(&self, kind: FilterKind, field: &str, value: &str) -> bool {
        self.kind == kind && self.field == field && self.value == value
    }

    /// Query-string key, e.g. `and_color`.
    pub fn query_key(&self) -> String {
        format!("{}_{}", self.kind.prefix(), self.field)
    }
}

// ---------------------------------------------------------------------------
// FilterSet
// ---------------------------------------------------------------------------

/// Ordered collection of filter clauses.
///
/// Clauses keep insertion order; [`grouped`](FilterSet::grouped) reorders
/// them by kind for display only. Some clauses can be marked as defaults so
/// that [`clear_non_default`](FilterSet::clear_non_default) keeps them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
    #[serde(default)]
    defaults: Vec<(FilterKind, String, String)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause unless the same (kind, field, value) is already present.
    ///
    /// Returns `true` if the clause was inserted.
    pub fn add(&mut self, kind: FilterKind, field: &str, value: &str, display_text: &str) -> bool {
        if self.contains(kind, field, value) {
            return false;
        }
        self.clauses.push(FilterClause {
            kind,
            field: field.to_string(),
            value: value.to_string(),
            display_text: display_text.to_string(),
        });
        true
    }

    /// Add a clause and remember it as a default that survives
    /// [`clear_non_default`](FilterSet::clear_non_default).
    pub fn add_default(&mut self, kind: FilterKind, field: &str, value: &str, display_text: &str) {
        self.add(kind, field, value, display_text);
        if !self.is_default(kind, field, value) {
            self.defaults
                .push((kind, field.to_string(), value.to_string()));
        }
    }

    /// Remove the clause at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<FilterClause> {
        if index < self.clauses.len() {
            Some(self.clauses.remove(index))
        } else {
            None
        }
    }

    /// Remove the first clause matching (kind, field, value).
    pub fn remove_matching(&mut self, kind: FilterKind, field: &str, value: &str) -> Option<FilterClause> {
        let index = self
            .clauses
            .iter()
            .position(|c| c.matches(kind, field, value))?;
        self.remove(index)
    }

    /// Drop every clause for which `keep` returns `false`.
    pub fn clear<F>(&mut self, mut keep: F)
    where
        F: FnMut(&FilterClause) -> bool,
    {
        self.clauses.retain(|c| keep(c));
    }

    pub fn clear_all(&mut self) {
        self.clauses.clear();
    }

    /// Drop everything except the clauses registered with
    /// [`add_default`](FilterSet::add_default).
    pub fn clear_non_default(&mut self) {
        let defaults = std::mem::take(&mut self.defaults);
        self.clauses.retain(|c| {
            defaults
                .iter()
                .any(|(k, f, v)| c.matches(*k, f, v))
        });
        self.defaults = defaults;
    }

    pub fn contains(&self, kind: FilterKind, field: &str, value: &str) -> bool {
        self.clauses.iter().any(|c| c.matches(kind, field, value))
    }

    fn is_default(&self, kind: FilterKind, field: &str, value: &str) -> bool {
        self.defaults
            .iter()
            .any(|(k, f, v)| *k == kind && f == field && v == value)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterClause> {
        self.clauses.iter()
    }

    /// Clauses grouped for display: OR, then AND, then NOT. Empty groups are
    /// omitted. Each entry carries the clause's index in the set so callers
    /// can pass it back to [`remove`](FilterSet::remove).
    pub fn grouped(&self) -> Vec<(FilterKind, Vec<(usize, &FilterClause)>)> {
        FilterKind::DISPLAY_ORDER
            .iter()
            .filter_map(|kind| {
                let group: Vec<(usize, &FilterClause)> = self
                    .clauses
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.kind == *kind)
                    .collect();
                if group.is_empty() {
                    None
                } else {
                    Some((*kind, group))
                }
            })
            .collect()
    }

    /// Query-string pairs for the search endpoint, in insertion order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.clauses
            .iter()
            .map(|c| (c.query_key(), c.value.clone()))
            .collect()
    }

    /// Rebuild a filter set from query-string pairs.
    ///
    /// Keys without an `and_`/`or_`/`not_` prefix are ignored. The value is
    /// used as the display text since the original label is not mirrored.
    pub fn from_query_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = FilterSet::new();
        for (key, value) in pairs {
            if let Some((kind, field)) = parse_filter_key(key.as_ref()) {
                set.add(kind, field, value.as_ref(), value.as_ref());
            }
        }
        set
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterClause;
    type IntoIter = std::slice::Iter<'a, FilterClause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

/// Split `and_color` into (`And`, `"color"`).
pub(crate) fn parse_filter_key(key: &str) -> Option<(FilterKind, &str)> {
    let (prefix, field) = key.split_once('_')?;
    if field.is_empty() {
        return None;
    }
    let kind = prefix.parse::<FilterKind>().ok()?;
    Some((kind, field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filter_key_splits_on_first_underscore() {
        assert_eq!(
            parse_filter_key("and_set_name"),
            Some((FilterKind::And, "set_name"))
        );
        assert_eq!(parse_filter_key("not_rarity"), Some((FilterKind::Not, "rarity")));
        assert_eq!(parse_filter_key("page"), None);
        assert_eq!(parse_filter_key("xor_color"), None);
        assert_eq!(parse_filter_key("or_"), None);
    }
}
