//! Tests for CSV source loading and structural tolerance

use super::write_source;
use crate::app::services::source_adapter::{SourceDescriptor, load_source, read_rows};
use tempfile::TempDir;

#[test]
fn test_load_simple_register() {
    let temp_dir = TempDir::new().unwrap();
    let descriptor = write_source(
        temp_dir.path(),
        "local-authority-eng.csv",
        "local-authority-eng",
        "local-authority-eng,name,local-authority-type\n\
         BIR,Birmingham City Council,MD\n\
         LND,City of London Corporation,CC\n",
    )
    .unwrap();

    let loaded = load_source(&descriptor).unwrap();
    assert_eq!(loaded.stats.rows_loaded, 2);
    assert_eq!(loaded.stats.rows_skipped, 0);
    assert!(!loaded.stats.missing_key_column);

    assert_eq!(loaded.rows[0].get("local-authority-eng"), Some("BIR"));
    assert_eq!(loaded.rows[0].get("name"), Some("Birmingham City Council"));
    // row order preserved from the file
    assert_eq!(loaded.rows[1].get("local-authority-eng"), Some("LND"));
}

#[test]
fn test_missing_file_is_an_error() {
    let descriptor = SourceDescriptor::new(
        "missing",
        "/nonexistent/source.csv",
        "local-authority-eng",
    );
    let result = load_source(&descriptor);
    assert!(matches!(
        result,
        Err(crate::Error::SourceNotFound { .. })
    ));
}

#[test]
fn test_wrong_column_count_skips_row_only() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng");
    let content = "local-authority-eng,name\n\
                   BIR,Birmingham City Council\n\
                   BAD,too,many,columns\n\
                   CAM,Cambridge City Council\n";

    let (rows, stats) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert_eq!(stats.rows_loaded, 2);
    assert_eq!(stats.rows_skipped, 1);
    assert_eq!(rows[0].get("local-authority-eng"), Some("BIR"));
    assert_eq!(rows[1].get("local-authority-eng"), Some("CAM"));
}

#[test]
fn test_missing_key_column_reported_once() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng");
    let content = "name,website\nBirmingham,https://birmingham.gov.uk\n";

    let (rows, stats) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert!(stats.missing_key_column);
    // rows still load; they just cannot key into the registry
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("local-authority-eng"), None);
}

#[test]
fn test_empty_values_are_absent() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng");
    let content = "local-authority-eng,name,website\nBIR,Birmingham City Council,\n";

    let (rows, _) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert_eq!(rows[0].get("website"), None);
    assert_eq!(rows[0].get("name"), Some("Birmingham City Council"));
}

#[test]
fn test_renames_applied_to_header() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng")
        .with_rename(
            "statistical-geography-county-eng",
            "statistical-geography",
        );
    let content = "local-authority-eng,statistical-geography-county-eng\nCAM,E10000003\n";

    let (rows, stats) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert!(!stats.missing_key_column);
    assert_eq!(rows[0].get("statistical-geography"), Some("E10000003"));
    assert_eq!(rows[0].get("statistical-geography-county-eng"), None);
}

#[test]
fn test_ignore_superseded_drops_ended_rows() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng")
        .with_ignore_superseded();
    let content = "local-authority-eng,statistical-geography,end-date\n\
                   NOR,E07000154,2021-03-31\n\
                   NOR,E06000066,\n";

    let (rows, stats) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert_eq!(stats.rows_superseded, 1);
    assert_eq!(rows.len(), 1);
    // only the current code survives
    assert_eq!(rows[0].get("statistical-geography"), Some("E06000066"));
}

#[test]
fn test_values_trimmed() {
    let descriptor = SourceDescriptor::new("test", "unused.csv", "local-authority-eng");
    let content = "local-authority-eng, name \nBIR, Birmingham City Council \n";

    let (rows, _) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert_eq!(rows[0].get("name"), Some("Birmingham City Council"));
}

#[test]
fn test_patch_descriptor_has_no_key_requirement() {
    let descriptor = SourceDescriptor::patch("dclg-patch", "unused.csv");
    let content = "name,website\nBirmingham City Council,https://www.birmingham.gov.uk\n";

    let (rows, stats) = read_rows(&descriptor, content.as_bytes()).unwrap();
    assert!(!stats.missing_key_column);
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_descriptor_prefix_defaults_to_key() {
    let descriptor = SourceDescriptor::new("register", "a.csv", "local-authority-eng");
    assert_eq!(descriptor.prefix, "local-authority-eng:");

    let bare = SourceDescriptor::new("curated", "b.csv", "organisation").with_bare_identifiers();
    assert_eq!(bare.prefix, "");
}
