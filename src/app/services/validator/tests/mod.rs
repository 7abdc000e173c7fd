//! Shared test utilities and fixtures for validator tests

use crate::app::models::SourceRow;
use crate::app::services::registry::OrganisationRegistry;
use crate::app::services::source_adapter::{LoadStats, LoadedSource, SourceDescriptor};


/// Seed a one-organisation registry from field/value pairs.
///
/// The `organisation` pair is the bare identifier, matching the curated
/// override source convention.
pub fn registry_with(pairs: Vec<(&str, &str)>) -> OrganisationRegistry {
    let mut registry = OrganisationRegistry::new();
    let row = SourceRow::from_pairs(pairs);
    let source = LoadedSource {
        descriptor: SourceDescriptor::new("test", "test.csv", "organisation")
            .with_bare_identifiers(),
        rows: vec![row],
        stats: LoadStats::default(),
    };
    registry.seed(&source);
    registry
}

/// A fully valid active metropolitan district, the baseline fixture
pub fn valid_active_district() -> Vec<(&'static str, &'static str)> {
    vec![
        ("organisation", "local-authority-eng:BIR"),
        ("name", "Birmingham City Council"),
        ("wikidata", "Q26732"),
        ("website", "https://www.birmingham.gov.uk"),
        ("statistical-geography", "E08000025"),
        ("opendatacommunities", "http://opendatacommunities.org/id/metropolitan-district-council/birmingham"),
        ("opendatacommunities-area", "http://statistics.data.gov.uk/id/statistical-geography/E08000025"),
        ("local-authority-type", "MD"),
    ]
}
