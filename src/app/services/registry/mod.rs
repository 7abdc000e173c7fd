//! Organisation registry service owning the canonical record table
//!
//! The registry maps each canonical identifier to its organisation record and
//! is the single mutable resource of a pipeline run. It is created at
//! pipeline start, threaded explicitly through seed/patch/finalise calls, and
//! handed read-only to the validator and publisher once merging completes.
//! There is no ambient global state.

use crate::app::models::{Curie, Organisation};
use std::collections::BTreeMap;

pub mod index;
pub mod merge;

#[cfg(test)]
pub mod tests;

pub use index::build_join_index;
pub use merge::{PassStats, PatchStats, SeedStats};

/// The canonical organisation table, keyed by CURIE
///
/// A `BTreeMap` keeps iteration in ascending identifier order, which makes
/// join-index construction deterministic and gives the publisher its sorted
/// output for free.
#[derive(Debug, Clone, Default)]
pub struct OrganisationRegistry {
    /// Canonical records indexed by identifier
    pub(crate) organisations: BTreeMap<Curie, Organisation>,

    /// Names of sources that have been seeded, in application order
    pub(crate) sources_applied: Vec<String>,
}

impl OrganisationRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an organisation record by identifier
    pub fn get(&self, curie: &Curie) -> Option<&Organisation> {
        self.organisations.get(curie)
    }

    /// Check whether an identifier has been assigned
    pub fn contains(&self, curie: &Curie) -> bool {
        self.organisations.contains_key(curie)
    }

    /// Number of organisations in the table
    pub fn len(&self) -> usize {
        self.organisations.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.organisations.is_empty()
    }

    /// Iterate over all records in ascending identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&Curie, &Organisation)> {
        self.organisations.iter()
    }

    /// Sources applied so far, in order
    pub fn sources_applied(&self) -> &[String] {
        &self.sources_applied
    }
}
