//! Publication of the canonical organisation table
//!
//! Serialises the table as CSV in the fixed column order declared in
//! [`crate::constants::OUTPUT_FIELDS`], rows in ascending identifier order.
//! Fields a record carries that are not part of the published schema are
//! projected away here; that is the schema boundary, not an error.

use crate::app::services::registry::OrganisationRegistry;
use crate::constants::{OUTPUT_FIELDS, fields};
use crate::{Error, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::info;

/// Counters describing a publication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishStats {
    /// Rows written, header excluded
    pub rows_written: usize,
}

/// Publish the table to any writer
pub fn publish<W: io::Write>(registry: &OrganisationRegistry, writer: W) -> Result<PublishStats> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(OUTPUT_FIELDS)
        .map_err(|e| Error::publishing("failed to write header", Some(e)))?;

    let mut stats = PublishStats::default();

    for (curie, organisation) in registry.iter() {
        let record: Vec<&str> = OUTPUT_FIELDS
            .iter()
            .map(|&field| {
                // the identifier column always echoes the table key, even
                // before finalisation has stamped it onto the record
                if field == fields::ORGANISATION {
                    curie.as_str()
                } else {
                    organisation.get_or_empty(field)
                }
            })
            .collect();

        csv_writer
            .write_record(&record)
            .map_err(|e| Error::publishing(format!("failed to write row for {}", curie), Some(e)))?;
        stats.rows_written += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| Error::io("failed to flush published table", e))?;

    Ok(stats)
}

/// Publish the table to a file path
pub fn publish_to_path(registry: &OrganisationRegistry, path: &Path) -> Result<PublishStats> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("failed to create {}", path.display()), e))?;
    let stats = publish(registry, file)?;
    info!("published {} organisations to {}", stats.rows_written, path.display());
    Ok(stats)
}
