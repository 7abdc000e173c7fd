//! Data models for organisation reconciliation
//!
//! This module contains the core data structures: the compact canonical
//! identifier (CURIE), the flat source row fed in by source adapters, and the
//! canonical organisation record whose only mutation path is first-write-wins.

use crate::constants::fields;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Canonical Identifier
// =============================================================================

/// Compact identifier naming exactly one canonical organisation
///
/// Either `<category-prefix>:<local-key>` (e.g. `local-authority-eng:BIR`)
/// or a bare key for externally-sourced entities. Immutable once assigned;
/// the registry assigns it at first encounter of a source record keyed by the
/// category's primary field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Curie(String);

impl Curie {
    /// Build a CURIE from a category prefix and a local key.
    ///
    /// The prefix is concatenated verbatim and carries its own trailing
    /// colon (`local-authority-eng:`), matching how source descriptors
    /// declare it. An empty prefix yields a bare identifier, used for
    /// curated sources that already carry full identifiers.
    pub fn from_prefixed(prefix: &str, key: &str) -> Self {
        Self(format!("{}{}", prefix, key))
    }

    /// The category prefix, if the identifier has one
    pub fn prefix(&self) -> Option<&str> {
        self.0.split_once(':').map(|(prefix, _)| prefix)
    }

    /// The local key part (the whole identifier when bare)
    pub fn local_key(&self) -> &str {
        self.0
            .split_once(':')
            .map(|(_, key)| key)
            .unwrap_or(&self.0)
    }

    /// The full identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Curie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Curie {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Curie {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Source Row
// =============================================================================

/// One row from an external feed: a flat mapping from field name to value.
///
/// Empty values are never stored, so `get` returning `Some` always means a
/// usable value. Field values are single scalar strings; sources with
/// multi-valued or nested data are flattened by their adapters before they
/// reach the merge engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    values: HashMap<String, String>,
}

impl SourceRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from field/value pairs, dropping empty values
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (field, value) in pairs {
            row.insert(field.into(), value.into());
        }
        row
    }

    /// Insert a value, silently dropping it when empty
    pub fn insert(&mut self, field: String, value: String) {
        if !value.is_empty() {
            self.values.insert(field, value);
        }
    }

    /// Get a field value; absent and empty are indistinguishable
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Iterate over all populated fields
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of populated fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row carries no values at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// =============================================================================
// Organisation Record
// =============================================================================

/// Canonical record for one organisation
///
/// Fields are absent or a single string value, and a field once set is never
/// overwritten by a later seed or patch: `fill` is the only merge-time
/// mutator and it refuses to replace populated fields. Normalisation after
/// merging (identifier echo, official-name preference, date cleanup) goes
/// through `overwrite`, which the merge engine never calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Organisation {
    values: HashMap<String, String>,
}

impl Organisation {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate a field if it is currently empty (first-write-wins).
    ///
    /// Returns true when the value was stored. Empty values never populate
    /// anything, so a later source can still supply the field.
    pub fn fill(&mut self, field: &str, value: &str) -> bool {
        if value.is_empty() || self.values.contains_key(field) {
            return false;
        }
        self.values.insert(field.to_string(), value.to_string());
        true
    }

    /// Whether filling this field with a non-empty value would store it
    pub fn would_fill(&self, field: &str, value: &str) -> bool {
        !value.is_empty() && !self.values.contains_key(field)
    }

    /// Replace a field regardless of its current value.
    ///
    /// Reserved for post-merge finalisation; the seed/patch path must use
    /// `fill` so the first-write-wins invariant holds.
    pub(crate) fn overwrite(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.values.remove(field);
        } else {
            self.values.insert(field.to_string(), value.to_string());
        }
    }

    /// Get a field value; absent and empty are indistinguishable
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Get a field value, defaulting to the empty string
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// Iterate over all populated fields
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names currently populated, for date normalisation sweeps
    pub fn field_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    // Typed accessors so downstream consumers never walk the raw map

    /// Human name
    pub fn name(&self) -> &str {
        self.get_or_empty(fields::NAME)
    }

    /// Local authority type code (e.g. `COMB`, `CTY`, `UA`)
    pub fn local_authority_type(&self) -> &str {
        self.get_or_empty(fields::LOCAL_AUTHORITY_TYPE)
    }

    /// ONS statistical geography code
    pub fn statistical_geography(&self) -> &str {
        self.get_or_empty(fields::STATISTICAL_GEOGRAPHY)
    }

    /// Lifecycle start date
    pub fn start_date(&self) -> &str {
        self.get_or_empty(fields::START_DATE)
    }

    /// Lifecycle end date; empty means the organisation is still active
    pub fn end_date(&self) -> &str {
        self.get_or_empty(fields::END_DATE)
    }

    /// Whether the organisation is currently active (no end date)
    pub fn is_active(&self) -> bool {
        self.end_date().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curie_prefixed() {
        // the prefix owns the separator, so exactly one colon comes out
        let curie = Curie::from_prefixed("local-authority-eng:", "BIR");
        assert_eq!(curie.as_str(), "local-authority-eng:BIR");
        assert_eq!(curie.prefix(), Some("local-authority-eng"));
        assert_eq!(curie.local_key(), "BIR");
    }

    #[test]
    fn test_curie_bare() {
        let curie = Curie::from_prefixed("", "government-organisation:D4");
        assert_eq!(curie.as_str(), "government-organisation:D4");

        let bare = Curie::from("glossary");
        assert_eq!(bare.prefix(), None);
        assert_eq!(bare.local_key(), "glossary");
    }

    #[test]
    fn test_curie_ordering_is_lexicographic() {
        let a = Curie::from("local-authority-eng:ABC");
        let b = Curie::from("local-authority-eng:BIR");
        let c = Curie::from("waste-authority:Z");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_source_row_drops_empty_values() {
        let row = SourceRow::from_pairs([("name", "Test Council"), ("website", "")]);
        assert_eq!(row.get("name"), Some("Test Council"));
        assert_eq!(row.get("website"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_fill_is_first_write_wins() {
        let mut org = Organisation::new();
        assert!(org.fill("website", "https://example.com"));
        assert!(!org.fill("website", "https://other.example.com"));
        assert_eq!(org.get("website"), Some("https://example.com"));
    }

    #[test]
    fn test_fill_ignores_empty_values() {
        let mut org = Organisation::new();
        assert!(!org.fill("website", ""));
        assert_eq!(org.get("website"), None);
        // an empty value does not claim the slot
        assert!(org.fill("website", "https://example.com"));
    }

    #[test]
    fn test_overwrite_replaces_and_clears() {
        let mut org = Organisation::new();
        org.fill("name", "Draft Name");
        org.overwrite("name", "Official Name");
        assert_eq!(org.name(), "Official Name");
        org.overwrite("name", "");
        assert_eq!(org.get("name"), None);
    }

    #[test]
    fn test_lifecycle_accessors() {
        let mut org = Organisation::new();
        assert!(org.is_active());
        org.fill("end-date", "2009-04-01");
        assert!(!org.is_active());
        assert_eq!(org.end_date(), "2009-04-01");
    }
}
