//! Join index construction
//!
//! A join index maps a field value to every canonical identifier currently
//! holding that value. It reflects the table as it stands *now*, not as it
//! stood when an earlier patch ran — which is exactly why patch sources are
//! re-run over multiple passes: one patch can supply the field another patch
//! needs to index on.

use crate::app::models::Curie;
use crate::app::services::registry::OrganisationRegistry;
use std::collections::HashMap;

/// Build an index from `field` value to the identifiers holding it.
///
/// Identifier lists are in ascending identifier order (table iteration
/// order), keeping patch application deterministic when one value names
/// several organisations.
pub fn build_join_index(
    registry: &OrganisationRegistry,
    field: &str,
) -> HashMap<String, Vec<Curie>> {
    let mut index: HashMap<String, Vec<Curie>> = HashMap::new();

    for (curie, organisation) in registry.iter() {
        if let Some(value) = organisation.get(field) {
            index.entry(value.to_string()).or_default().push(curie.clone());
        }
    }

    index
}
