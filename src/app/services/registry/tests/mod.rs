//! Shared test utilities and fixtures for registry tests

use crate::app::models::SourceRow;
use crate::app::services::source_adapter::{LoadStats, LoadedSource, SourceDescriptor};


/// Build an in-memory loaded source from rows of field/value pairs
pub fn source_from_rows(
    name: &str,
    key_field: &str,
    rows: Vec<Vec<(&str, &str)>>,
) -> LoadedSource {
    let rows: Vec<SourceRow> = rows.into_iter().map(SourceRow::from_pairs).collect();
    let stats = LoadStats {
        rows_loaded: rows.len(),
        ..Default::default()
    };
    LoadedSource {
        descriptor: SourceDescriptor::new(name, format!("{}.csv", name), key_field),
        rows,
        stats,
    }
}

/// As `source_from_rows` but with bare identifiers (no CURIE prefix)
pub fn bare_source_from_rows(
    name: &str,
    key_field: &str,
    rows: Vec<Vec<(&str, &str)>>,
) -> LoadedSource {
    let mut source = source_from_rows(name, key_field, rows);
    let descriptor = source.descriptor.clone().with_bare_identifiers();
    source.descriptor = descriptor;
    source
}
