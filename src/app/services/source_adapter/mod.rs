//! Source adapter service normalising external feeds into flat records
//!
//! Every external feed — a GOV.UK register file, a curated override CSV, a
//! geographic lookup table — is described by a [`SourceDescriptor`] and loaded
//! into an ordered sequence of [`SourceRow`]s. The adapter owns structural
//! tolerance: missing columns are absent values, malformed rows are logged
//! and skipped, and the load never aborts the run.

use crate::app::models::SourceRow;
use std::collections::HashMap;
use std::path::PathBuf;

pub mod reader;

#[cfg(test)]
pub mod tests;

pub use reader::{load_source, read_rows};

/// Description of one tabular source feeding the pipeline
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    /// Name used in logs and diagnostics, usually the register name
    pub name: String,

    /// Location of the CSV file backing the source
    pub path: PathBuf,

    /// Column whose value keys rows into the registry (seed key or join key)
    pub key_field: String,

    /// CURIE prefix prepended to key values; empty means the key column
    /// already carries full identifiers
    pub prefix: String,

    /// Source column names renamed before rows reach the merge engine
    pub renames: HashMap<String, String>,

    /// Drop rows carrying a non-empty end date, so a register's historic
    /// entries cannot leak superseded values into the registry
    pub ignore_superseded: bool,
}

impl SourceDescriptor {
    /// Describe a source whose key column names the category.
    ///
    /// The prefix defaults to `<key_field>:`, the register convention.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, key_field: impl Into<String>) -> Self {
        let key_field = key_field.into();
        let prefix = format!("{}:", key_field);
        Self {
            name: name.into(),
            path: path.into(),
            key_field,
            prefix,
            renames: HashMap::new(),
            ignore_superseded: false,
        }
    }

    /// Describe a patch source.
    ///
    /// Patch rows are matched by the merge engine's join keys rather than a
    /// single key column, so no key field is declared and no prefix applies.
    pub fn patch(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            key_field: String::new(),
            prefix: String::new(),
            renames: HashMap::new(),
            ignore_superseded: false,
        }
    }

    /// Override the CURIE prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Treat key values as complete identifiers, no prefix applied
    pub fn with_bare_identifiers(mut self) -> Self {
        self.prefix = String::new();
        self
    }

    /// Rename a source column before merging
    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    /// Skip rows whose end date is populated
    pub fn with_ignore_superseded(mut self) -> Self {
        self.ignore_superseded = true;
        self
    }
}

/// Counters describing how a source load went
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    /// Rows successfully turned into records
    pub rows_loaded: usize,

    /// Rows skipped for structural reasons (wrong column count)
    pub rows_skipped: usize,

    /// Rows dropped because `ignore_superseded` matched a populated end date
    pub rows_superseded: usize,

    /// Whether the header lacked the declared key column
    pub missing_key_column: bool,
}

/// A fully loaded source: descriptor, rows in file order, and load counters
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub descriptor: SourceDescriptor,
    pub rows: Vec<SourceRow>,
    pub stats: LoadStats,
}
