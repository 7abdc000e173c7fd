//! Application constants for the organisation builder
//!
//! This module contains the published column order, canonical field names,
//! CURIE prefixes, and default values used throughout the pipeline.

// =============================================================================
// Published Output Schema
// =============================================================================

/// Fixed column order for the published organisation table.
///
/// Declared once, independent of any single source's column order, so the
/// output is stable and diffable across runs. Fields a source supplies that
/// are not listed here are projected away at publication.
pub const OUTPUT_FIELDS: &[&str] = &[
    "organisation",
    "wikidata",
    "name",
    "website",
    "twitter",
    "statistical-geography",
    "toid",
    "opendatacommunities",
    "opendatacommunities-area",
    "billing-authority",
    "census-area",
    "local-authority-type",
    "esd-inventories",
    "addressbase-custodian",
    "combined-authority",
    "region",
    "local-resilience-forum",
    "start-date",
    "end-date",
];

/// Canonical field names used across sources and the registry
pub mod fields {
    pub const ORGANISATION: &str = "organisation";
    pub const WIKIDATA: &str = "wikidata";
    pub const NAME: &str = "name";
    pub const OFFICIAL_NAME: &str = "official-name";
    pub const WEBSITE: &str = "website";
    pub const STATISTICAL_GEOGRAPHY: &str = "statistical-geography";
    pub const OPENDATACOMMUNITIES: &str = "opendatacommunities";
    pub const OPENDATACOMMUNITIES_AREA: &str = "opendatacommunities-area";
    pub const BILLING_AUTHORITY: &str = "billing-authority";
    pub const LOCAL_AUTHORITY_TYPE: &str = "local-authority-type";
    pub const START_DATE: &str = "start-date";
    pub const END_DATE: &str = "end-date";
}

// =============================================================================
// Canonical Identifier Prefixes
// =============================================================================

/// CURIE prefixes for the organisation categories this pipeline knows about
pub mod prefixes {
    pub const LOCAL_AUTHORITY_ENG: &str = "local-authority-eng";
    pub const NATIONAL_PARK_AUTHORITY: &str = "national-park-authority";
    pub const DEVELOPMENT_CORPORATION: &str = "development-corporation";
    pub const WASTE_AUTHORITY: &str = "waste-authority";
    pub const TRANSPORT_AUTHORITY: &str = "transport-authority";
    pub const REGIONAL_PARK_AUTHORITY: &str = "regional-park-authority";
}

/// The Greater London Authority carries development-corporation style
/// validation requirements despite its local-authority-eng prefix
pub const GLA_CURIE: &str = "local-authority-eng:GLA";

// =============================================================================
// Merge Engine Defaults
// =============================================================================

/// Join keys tried, in order, for every patch source.
///
/// Order matters: earlier keys are more specific. Row order within a source
/// is preserved, so the first row supplying a value for an empty field wins.
pub const PATCH_JOIN_KEYS: &[&str] = &[
    "statistical-geography",
    "local-authority-eng",
    "wikidata",
    "billing-authority",
    "name",
];

/// Default number of patch passes.
///
/// The observed dependency depth between join keys is one: a patch source can
/// supply the very field (e.g. statistical-geography) that another patch
/// source needs to index on. Two passes therefore reach the fixed point; the
/// engine logs a warning if a probe pass after the configured passes would
/// still change the table.
pub const DEFAULT_PATCH_PASSES: usize = 2;

/// Minimum permitted patch passes for full convergence
pub const MIN_PATCH_PASSES: usize = 2;

// =============================================================================
// Source Plan Defaults
// =============================================================================

/// Default directory holding collected register files
pub const DEFAULT_REGISTER_DIR: &str = "collection/register";

/// Default path of the curated organisation override file
pub const DEFAULT_ORGANISATION_CSV: &str = "data/organisation.csv";

/// Default output path for the published table
pub const DEFAULT_OUTPUT_PATH: &str = "collection/organisation.csv";

/// Statistical geography registers seeded into local-authority records.
///
/// Each register file is named `statistical-geography-<name>.csv` and carries
/// its code under a column of the same name, renamed to
/// `statistical-geography` at load time.
pub const STATISTICAL_GEOGRAPHY_REGISTERS: &[&str] = &[
    "county-eng",
    "london-borough-eng",
    "metropolitan-district-eng",
    "non-metropolitan-district-eng",
    "unitary-authority-eng",
];

// =============================================================================
// Date Handling
// =============================================================================

/// Canonical date format for lifecycle fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp suffix stripped from lifecycle dates at finalisation.
///
/// Linked-data sources emit xsd:dateTime values with a blank midnight time;
/// the published table carries bare calendar dates.
pub const BLANK_TIME_SUFFIX: &str = "T00:00:00Z";

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit code when validation reported one or more errors
pub const EXIT_VALIDATION_FAILED: i32 = 2;
