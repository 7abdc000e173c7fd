//! Validation service for the canonical organisation table
//!
//! Validation is purely diagnostic: it never mutates the table, and every
//! per-record problem is collected rather than raised, so one bad record
//! never blocks the rest. The caller decides whether a non-zero error count
//! aborts downstream publication.

use crate::app::models::{Curie, Organisation};
use crate::app::services::classifier::{Category, classify};
use crate::app::services::registry::OrganisationRegistry;
use crate::constants::fields;
use std::fmt;
use tracing::{error, warn};

pub mod checks;
pub mod rules;

#[cfg(test)]
pub mod tests;

pub use rules::FieldSets;

/// One itemised validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Identifier of the organisation the finding concerns
    pub organisation: Curie,

    /// Field the finding concerns
    pub field: String,

    /// Human-readable reason
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.organisation, self.message, self.field)
    }
}

/// Aggregated validation outcome: itemised errors and warnings
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Fatal findings; a non-zero count fails the run
    pub errors: Vec<Diagnostic>,

    /// Non-fatal findings; reported but never fail the run
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Number of errors found
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings found
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether the table passed with no errors (warnings allowed)
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, curie: &Curie, field: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            organisation: curie.clone(),
            field: field.to_string(),
            message: message.into(),
        };
        error!("{}", diagnostic);
        self.errors.push(diagnostic);
    }

    fn warning(&mut self, curie: &Curie, field: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            organisation: curie.clone(),
            field: field.to_string(),
            message: message.into(),
        };
        warn!("{}", diagnostic);
        self.warnings.push(diagnostic);
    }
}

/// Fields whose values must be empty or a syntactically valid absolute URL
const URL_FIELDS: &[&str] = &[
    fields::OPENDATACOMMUNITIES,
    fields::OPENDATACOMMUNITIES_AREA,
    fields::WEBSITE,
];

/// Fields whose values must be empty or a parseable calendar date
const DATE_FIELDS: &[&str] = &[fields::START_DATE, fields::END_DATE];

/// Validate every record in the table.
///
/// The registry is taken read-only; merging is complete by the time
/// validation runs.
pub fn validate(registry: &OrganisationRegistry) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    for (curie, organisation) in registry.iter() {
        validate_organisation(curie, organisation, &mut diagnostics);
    }

    diagnostics
}

fn validate_organisation(curie: &Curie, organisation: &Organisation, diagnostics: &mut Diagnostics) {
    let category = classify(curie, organisation);

    for field in URL_FIELDS {
        if let Some(value) = organisation.get(field) {
            if !checks::is_valid_url(value) {
                diagnostics.error(curie, field, format!("invalid url {}", value));
            }
        }
    }

    for field in DATE_FIELDS {
        if let Some(value) = organisation.get(field) {
            if !checks::is_valid_date(value) {
                diagnostics.error(curie, field, format!("invalid date {}", value));
            }
        }
    }

    check_geography_code(curie, organisation, &category, diagnostics);

    let sets = rules::field_sets(curie, &category, organisation.is_active());

    for field in &sets.unexpected {
        if organisation.get(field).is_some() {
            diagnostics.error(
                curie,
                field,
                format!("unexpected {} field for this category", field),
            );
        }
    }

    for field in &sets.expected {
        if organisation.get(field).is_none() {
            diagnostics.warning(curie, field, format!("missing {} field", field));
        }
    }

    for field in &sets.mandatory {
        if organisation.get(field).is_none() {
            diagnostics.error(curie, field, format!("missing {} field", field));
        }
    }
}

/// Check the statistical geography code against the category's pattern.
///
/// A category with no geographic extent never reaches this check; its code
/// field is already in the unexpected set, and a present code yields exactly
/// the one error from there. A category that should have a pattern but has
/// none in the table is itself a defect worth surfacing, so a present code
/// without a pattern is an error too.
fn check_geography_code(
    curie: &Curie,
    organisation: &Organisation,
    category: &Category,
    diagnostics: &mut Diagnostics,
) {
    if !category.has_geographic_extent() {
        return;
    }

    let code = organisation.statistical_geography();
    if code.is_empty() {
        return;
    }

    match rules::geography_pattern(category) {
        Some(pattern) => {
            if !pattern.is_match(code) {
                diagnostics.error(
                    curie,
                    fields::STATISTICAL_GEOGRAPHY,
                    format!("geography code {} does not match the category pattern", code),
                );
            }
        }
        None => {
            diagnostics.error(
                curie,
                fields::STATISTICAL_GEOGRAPHY,
                "no geography code pattern defined for this category",
            );
        }
    }
}
