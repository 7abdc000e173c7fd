//! Category- and lifecycle-conditional validation rule table
//!
//! This table grew case by case as categories were added to the dataset and
//! is preserved exactly; a category with no explicit rule here gets the
//! weakest profile rather than a guessed default, and a missing geography
//! pattern is surfaced by the validator instead of being silently ignored.

use crate::app::models::Curie;
use crate::app::services::classifier::{AuthorityType, Category};
use crate::constants::{GLA_CURIE, fields};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// The three per-record field sets validation works through
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSets {
    /// Must be non-empty; a gap is an error
    pub mandatory: Vec<&'static str>,

    /// Should be non-empty; a gap is a warning
    pub expected: Vec<&'static str>,

    /// Must be empty; a value is an error (field structurally inapplicable)
    pub unexpected: Vec<&'static str>,
}

/// Compute the field sets for one record.
///
/// Lifecycle matters: ended organisations keep only the base requirements —
/// nobody expects a dissolved council to maintain a website. The special
/// cases mirror the upstream data realities they encode:
/// - opendatacommunities has no URIs for combined authorities yet, so those
///   cross-references are merely expected there;
/// - no URIs exist for development corporation areas (or the GLA's), so the
///   area reference is expected rather than mandatory for them.
pub fn field_sets(curie: &Curie, category: &Category, active: bool) -> FieldSets {
    let mut sets = FieldSets {
        mandatory: vec![fields::NAME, fields::WIKIDATA],
        ..Default::default()
    };

    if !category.has_geographic_extent() {
        sets.unexpected.push(fields::STATISTICAL_GEOGRAPHY);
    }

    if !active {
        return sets;
    }

    sets.mandatory.push(fields::WEBSITE);

    match category {
        Category::LocalAuthorityEng { authority_type } if authority_type.is_combined() => {
            sets.expected.extend([
                fields::STATISTICAL_GEOGRAPHY,
                fields::OPENDATACOMMUNITIES,
                fields::OPENDATACOMMUNITIES_AREA,
            ]);
        }
        Category::DevelopmentCorporation => {
            sets.mandatory
                .extend([fields::STATISTICAL_GEOGRAPHY, fields::OPENDATACOMMUNITIES]);
            sets.expected.push(fields::OPENDATACOMMUNITIES_AREA);
        }
        Category::LocalAuthorityEng { .. } if curie.as_str() == GLA_CURIE => {
            sets.mandatory
                .extend([fields::STATISTICAL_GEOGRAPHY, fields::OPENDATACOMMUNITIES]);
            sets.expected.push(fields::OPENDATACOMMUNITIES_AREA);
        }
        Category::LocalAuthorityEng { .. } | Category::NationalParkAuthority => {
            sets.mandatory.extend([
                fields::STATISTICAL_GEOGRAPHY,
                fields::OPENDATACOMMUNITIES,
                fields::OPENDATACOMMUNITIES_AREA,
            ]);
        }
        Category::WasteAuthority
        | Category::TransportAuthority
        | Category::RegionalParkAuthority
        | Category::Unclassified => {}
    }

    sets
}

/// ONS statistical geography code patterns per category and subtype
fn pattern_table() -> &'static HashMap<&'static str, Regex> {
    static TABLE: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let entries = [
            ("E06", r"^E06\d{6}$"), // unitary authorities, Isles of Scilly
            ("E07", r"^E07\d{6}$"), // non-metropolitan districts
            ("E08", r"^E08\d{6}$"), // metropolitan districts
            ("E09", r"^E09\d{6}$"), // London boroughs, City of London
            ("E10", r"^E10\d{6}$"), // counties
            ("E26", r"^E26\d{6}$"), // national parks
            ("E47", r"^E47\d{6}$"), // combined authorities
            ("E51", r"^E51\d{6}$"), // development corporations
            ("E61", r"^E61\d{6}$"), // the Greater London Authority
        ];
        entries
            .into_iter()
            .map(|(key, pattern)| (key, Regex::new(pattern).expect("static pattern")))
            .collect()
    })
}

/// The geography code pattern for a category, if one is defined.
///
/// `None` is a pattern-table gap, which the validator reports when a record
/// in that category carries a code — the gap itself is the defect.
pub fn geography_pattern(category: &Category) -> Option<&'static Regex> {
    let key = match category {
        Category::LocalAuthorityEng { authority_type } => match authority_type {
            AuthorityType::UnitaryAuthority | AuthorityType::CouncilOfTheIsles => "E06",
            AuthorityType::District => "E07",
            AuthorityType::MetropolitanDistrict => "E08",
            AuthorityType::LondonBorough | AuthorityType::CityCorporation => "E09",
            AuthorityType::County => "E10",
            AuthorityType::Combined => "E47",
            AuthorityType::StrategicRegionalAuthority => "E61",
            AuthorityType::Unknown => return None,
        },
        Category::NationalParkAuthority => "E26",
        Category::DevelopmentCorporation => "E51",
        // no geographic extent or unknown category: no pattern defined
        Category::WasteAuthority
        | Category::TransportAuthority
        | Category::RegionalParkAuthority
        | Category::Unclassified => return None,
    };

    pattern_table().get(key)
}
