//! CSV reading for source adapters
//!
//! Turns a CSV file (or any reader) into ordered [`SourceRow`]s under the
//! structural tolerance rules: malformed rows are logged and skipped, a
//! missing key column is reported once, and the load always completes.

use crate::app::models::SourceRow;
use crate::app::services::source_adapter::{LoadStats, LoadedSource, SourceDescriptor};
use crate::constants::fields;
use crate::{Error, Result};
use std::fs::File;
use std::io;
use tracing::{debug, error, info};

/// Load a source from the file named by its descriptor.
///
/// Fails only when the file cannot be opened or its header cannot be read;
/// every per-row problem is downgraded to a logged skip.
pub fn load_source(descriptor: &SourceDescriptor) -> Result<LoadedSource> {
    info!("loading {} from {}", descriptor.name, descriptor.path.display());

    let file = File::open(&descriptor.path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::source_not_found(descriptor.path.display().to_string())
        } else {
            Error::io(
                format!("failed to open source '{}'", descriptor.name),
                e,
            )
        }
    })?;

    let (rows, stats) = read_rows(descriptor, file)?;
    debug!(
        "loaded {}: {} rows ({} skipped, {} superseded)",
        descriptor.name, stats.rows_loaded, stats.rows_skipped, stats.rows_superseded
    );

    Ok(LoadedSource {
        descriptor: descriptor.clone(),
        rows,
        stats,
    })
}

/// Read rows for a descriptor from any reader.
///
/// Column renames are applied before anything else, so the key check and the
/// superseded check both see canonical field names. Rows whose column count
/// does not match the header are structural errors: reported with the source
/// name and declared key, then skipped.
pub fn read_rows<R: io::Read>(
    descriptor: &SourceDescriptor,
    input: R,
) -> Result<(Vec<SourceRow>, LoadStats)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| {
            Error::csv_parsing(
                descriptor.name.clone(),
                "failed to read header row",
                Some(e),
            )
        })?
        .iter()
        .map(|h| {
            let h = h.trim();
            descriptor
                .renames
                .get(h)
                .cloned()
                .unwrap_or_else(|| h.to_string())
        })
        .collect();

    let mut stats = LoadStats::default();

    // A header without the declared key column is a structural defect of the
    // whole source; every row would be unkeyed, so report it once up front.
    // Patch sources declare no key field and are exempt.
    if !descriptor.key_field.is_empty() && !headers.iter().any(|h| h == &descriptor.key_field) {
        error!(
            "{}: header missing declared key column '{}'",
            descriptor.name, descriptor.key_field
        );
        stats.missing_key_column = true;
    }

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                error!(
                    "{}: skipping malformed row (key '{}'): {}",
                    descriptor.name, descriptor.key_field, e
                );
                stats.rows_skipped += 1;
                continue;
            }
        };

        if record.len() != headers.len() {
            error!(
                "{}: skipping row with {} columns, header has {} (key '{}')",
                descriptor.name,
                record.len(),
                headers.len(),
                descriptor.key_field
            );
            stats.rows_skipped += 1;
            continue;
        }

        let mut row = SourceRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), value.trim().to_string());
        }

        if descriptor.ignore_superseded && row.get(fields::END_DATE).is_some() {
            stats.rows_superseded += 1;
            continue;
        }

        rows.push(row);
        stats.rows_loaded += 1;
    }

    Ok((rows, stats))
}
