//! Seed and patch merge operations
//!
//! Seeding establishes the canonical identifier space: every source row with
//! a non-empty key value creates (or revisits) exactly one record. Patching
//! never creates identifiers; it only fills empty fields on records matched
//! through a join index over the current table. Both honour first-write-wins,
//! so source declaration order and row order decide every conflict.

use crate::app::models::{Curie, Organisation};
use crate::app::services::registry::{OrganisationRegistry, build_join_index};
use crate::app::services::source_adapter::LoadedSource;
use crate::constants::BLANK_TIME_SUFFIX;
use crate::constants::fields;
use tracing::{debug, info, warn};

/// Counters for one seed application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedStats {
    /// Identifiers created by this source
    pub organisations_created: usize,

    /// Fields populated (including on pre-existing records)
    pub fields_filled: usize,

    /// Rows without a key value, contributing nothing
    pub rows_unkeyed: usize,
}

/// Counters for one patch application
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchStats {
    /// Rows whose join value matched at least one identifier
    pub rows_matched: usize,

    /// Fields populated across all matched records
    pub fields_filled: usize,
}

/// Counters for a full multi-pass patch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassStats {
    /// Fields filled in each configured pass
    pub fills_per_pass: Vec<usize>,

    /// Fields a further pass would still fill; non-zero means the
    /// configured pass count did not converge. The probe is a dry run and
    /// never changes the table.
    pub probe_fills: usize,
}

impl PassStats {
    /// Total fields filled by the configured passes
    pub fn total_fills(&self) -> usize {
        self.fills_per_pass.iter().sum()
    }

    /// Whether the configured passes reached the fixed point
    pub fn converged(&self) -> bool {
        self.probe_fills == 0
    }
}

impl OrganisationRegistry {
    /// Seed the registry from a source, establishing canonical identifiers.
    ///
    /// Every row with a non-empty key value maps to the CURIE
    /// `<prefix><key>`; unseen identifiers get an empty record, and every
    /// other non-empty field on the row is copied in under first-write-wins.
    /// Seeding the same source twice is a no-op for already-populated fields
    /// and never duplicates identifiers.
    pub fn seed(&mut self, source: &LoadedSource) -> SeedStats {
        let descriptor = &source.descriptor;
        info!(
            "seeding {} (key '{}', prefix '{}')",
            descriptor.name, descriptor.key_field, descriptor.prefix
        );

        let mut stats = SeedStats::default();

        for row in &source.rows {
            let key = match row.get(&descriptor.key_field) {
                Some(key) => key,
                None => {
                    stats.rows_unkeyed += 1;
                    continue;
                }
            };

            let curie = Curie::from_prefixed(&descriptor.prefix, key);
            let organisation = self.organisations.entry(curie).or_insert_with(|| {
                stats.organisations_created += 1;
                Organisation::new()
            });

            for (field, value) in row.fields() {
                if organisation.fill(field, value) {
                    stats.fields_filled += 1;
                }
            }
        }

        self.sources_applied.push(descriptor.name.clone());
        debug!(
            "seeded {}: {} created, {} fields filled",
            descriptor.name, stats.organisations_created, stats.fields_filled
        );
        stats
    }

    /// Patch existing records from source rows, keyed by `join_field`.
    ///
    /// The join index is rebuilt from the table's current state on every
    /// call. Rows matching zero identifiers are silently skipped; a patch
    /// source routinely carries entries outside this table's scope.
    pub fn patch(&mut self, rows: &[crate::app::models::SourceRow], join_field: &str) -> PatchStats {
        let index = build_join_index(self, join_field);
        let mut stats = PatchStats::default();

        for row in rows {
            let join_value = match row.get(join_field) {
                Some(value) => value,
                None => continue,
            };

            let Some(matches) = index.get(join_value) else {
                continue;
            };

            stats.rows_matched += 1;
            for curie in matches {
                // the index was built from this table, so the lookup holds
                if let Some(organisation) = self.organisations.get_mut(curie) {
                    for (field, value) in row.fields() {
                        if organisation.fill(field, value) {
                            stats.fields_filled += 1;
                        }
                    }
                }
            }
        }

        stats
    }

    /// Run the configured number of patch passes over the patch sources.
    ///
    /// Each pass applies every source against every join key, in declaration
    /// order. At least two passes are needed for convergence at the observed
    /// join-key dependency depth; after the configured passes a probe dry
    /// run checks whether another pass would still fill anything, and a
    /// non-zero count is reported as a warning. Only the configured passes
    /// touch the table.
    pub fn run_patch_passes(
        &mut self,
        sources: &[LoadedSource],
        join_keys: &[&str],
        passes: usize,
    ) -> PassStats {
        let mut stats = PassStats::default();

        for pass in 1..=passes {
            let filled = self.patch_pass(sources, join_keys);
            debug!("patch pass {}/{}: {} fields filled", pass, passes, filled);
            stats.fills_per_pass.push(filled);
        }

        stats.probe_fills = self.probe_pass(sources, join_keys);
        if stats.probe_fills > 0 {
            warn!(
                "patch passes did not converge: another pass would fill {} more fields; \
                 increase the pass count",
                stats.probe_fills
            );
        }

        stats
    }

    /// One full pass: every patch source against every join key
    fn patch_pass(&mut self, sources: &[LoadedSource], join_keys: &[&str]) -> usize {
        let mut filled = 0;
        for source in sources {
            for join_key in join_keys {
                debug!("patching {} with {}", source.descriptor.name, join_key);
                filled += self.patch(&source.rows, join_key).fields_filled;
            }
        }
        filled
    }

    /// Dry-run pass: count the fields one more pass would fill, leaving the
    /// table untouched
    fn probe_pass(&self, sources: &[LoadedSource], join_keys: &[&str]) -> usize {
        let mut fills = 0;
        for source in sources {
            for join_key in join_keys {
                let index = build_join_index(self, join_key);
                for row in &source.rows {
                    let Some(join_value) = row.get(join_key) else {
                        continue;
                    };
                    let Some(matches) = index.get(join_value) else {
                        continue;
                    };
                    for curie in matches {
                        if let Some(organisation) = self.organisations.get(curie) {
                            for (field, value) in row.fields() {
                                if organisation.would_fill(field, value) {
                                    fills += 1;
                                }
                            }
                        }
                    }
                }
            }
        }
        fills
    }

    /// Identifier and name normalisation, run once after seeding and before
    /// the patch passes:
    /// - every record echoes its identifier in the `organisation` field;
    /// - a register `official-name` takes precedence over `name`.
    ///
    /// Running before patching matters: the `name` join key must see the
    /// official name.
    pub fn finalise(&mut self) {
        for (curie, organisation) in self.organisations.iter_mut() {
            organisation.overwrite(fields::ORGANISATION, curie.as_str());

            if let Some(official) = organisation.get(fields::OFFICIAL_NAME) {
                let official = official.to_string();
                organisation.overwrite(fields::NAME, &official);
            }
        }
    }

    /// Strip the blank `T00:00:00Z` timestamp suffix from lifecycle dates.
    ///
    /// Runs after the patch passes, because patch sources are the ones
    /// carrying xsd:dateTime values; stripping earlier would miss every
    /// date a patch supplies.
    pub fn normalise_dates(&mut self) {
        for organisation in self.organisations.values_mut() {
            for field in organisation.field_names() {
                if !field.ends_with("-date") {
                    continue;
                }
                if let Some(value) = organisation.get(&field) {
                    if let Some(date) = value.strip_suffix(BLANK_TIME_SUFFIX) {
                        let date = date.to_string();
                        organisation.overwrite(&field, &date);
                    }
                }
            }
        }
    }
}
