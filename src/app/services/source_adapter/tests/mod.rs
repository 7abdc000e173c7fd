//! Shared test utilities and fixtures for source adapter tests

use crate::app::services::source_adapter::SourceDescriptor;
use std::fs;
use std::path::Path;

pub mod reader_tests;

/// Write a CSV source file and return a descriptor pointing at it
pub fn write_source(
    dir: &Path,
    filename: &str,
    key_field: &str,
    content: &str,
) -> std::io::Result<SourceDescriptor> {
    let path = dir.join(filename);
    fs::write(&path, content)?;
    Ok(SourceDescriptor::new(
        filename.trim_end_matches(".csv"),
        path,
        key_field,
    ))
}
