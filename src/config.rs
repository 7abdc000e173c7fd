//! Configuration for the organisation build pipeline.
//!
//! Captures where register files and curated overrides live, which patch
//! files to apply, how many merge passes to run, and where the published
//! table goes. The source plan methods translate the configuration into the
//! [`SourceDescriptor`]s the pipeline executes, in order.

use crate::app::services::source_adapter::SourceDescriptor;
use crate::constants::{
    DEFAULT_ORGANISATION_CSV, DEFAULT_OUTPUT_PATH, DEFAULT_PATCH_PASSES, DEFAULT_REGISTER_DIR,
    MIN_PATCH_PASSES, PATCH_JOIN_KEYS, STATISTICAL_GEOGRAPHY_REGISTERS, fields, prefixes,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one organisation build run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding collected register CSV files
    pub register_dir: PathBuf,

    /// Curated organisation override file, keyed on full identifiers
    pub organisation_csv: PathBuf,

    /// Patch files applied during the merge passes, in order
    pub patch_files: Vec<PathBuf>,

    /// Join keys tried, in order, for every patch source
    pub patch_join_keys: Vec<String>,

    /// Number of merge passes over the patch files
    pub patch_passes: usize,

    /// Where the published table is written
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            register_dir: PathBuf::from(DEFAULT_REGISTER_DIR),
            organisation_csv: PathBuf::from(DEFAULT_ORGANISATION_CSV),
            patch_files: Vec::new(),
            patch_join_keys: PATCH_JOIN_KEYS.iter().map(|k| k.to_string()).collect(),
            patch_passes: DEFAULT_PATCH_PASSES,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl PipelineConfig {
    /// Set the register directory
    pub fn with_register_dir(mut self, register_dir: impl Into<PathBuf>) -> Self {
        self.register_dir = register_dir.into();
        self
    }

    /// Set the curated organisation override file
    pub fn with_organisation_csv(mut self, organisation_csv: impl Into<PathBuf>) -> Self {
        self.organisation_csv = organisation_csv.into();
        self
    }

    /// Set the patch files to apply
    pub fn with_patch_files(mut self, patch_files: Vec<PathBuf>) -> Self {
        self.patch_files = patch_files;
        self
    }

    /// Set the number of merge passes
    pub fn with_patch_passes(mut self, patch_passes: usize) -> Self {
        self.patch_passes = patch_passes;
        self
    }

    /// Set the published table location
    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Validate the configuration before the pipeline starts.
    ///
    /// Fails fast on a missing register directory or a pass count below the
    /// convergence minimum; per-file problems are left for the load step,
    /// which reports them with source context.
    pub fn validate(&self) -> Result<()> {
        if !self.register_dir.is_dir() {
            return Err(Error::configuration(format!(
                "register directory does not exist: {}",
                self.register_dir.display()
            )));
        }

        if self.patch_passes < MIN_PATCH_PASSES {
            return Err(Error::configuration(format!(
                "patch passes must be at least {} for the merge to converge, got {}",
                MIN_PATCH_PASSES, self.patch_passes
            )));
        }

        if self.patch_join_keys.is_empty() {
            return Err(Error::configuration(
                "at least one patch join key is required",
            ));
        }

        Ok(())
    }

    /// The seed register of English local authorities
    pub fn local_authority_register(&self) -> SourceDescriptor {
        SourceDescriptor::new(
            prefixes::LOCAL_AUTHORITY_ENG,
            self.register_path(prefixes::LOCAL_AUTHORITY_ENG),
            prefixes::LOCAL_AUTHORITY_ENG,
        )
    }

    /// The curated override file, carrying full identifiers in its key column
    pub fn curated_organisations(&self) -> SourceDescriptor {
        SourceDescriptor::new(
            "organisation",
            self.organisation_csv.clone(),
            fields::ORGANISATION,
        )
        .with_bare_identifiers()
    }

    /// The government-organisation register, applied as a patch
    pub fn government_organisation_register(&self) -> SourceDescriptor {
        SourceDescriptor::patch(
            "government-organisation",
            self.register_path("government-organisation"),
        )
    }

    /// Statistical geography registers seeded onto local-authority records.
    ///
    /// Each renames its own code column to `statistical-geography` and drops
    /// superseded rows so only the current code reaches the registry.
    pub fn statistical_geography_registers(&self) -> Vec<SourceDescriptor> {
        STATISTICAL_GEOGRAPHY_REGISTERS
            .iter()
            .map(|name| {
                let register = format!("statistical-geography-{}", name);
                SourceDescriptor::new(
                    register.clone(),
                    self.register_path(&register),
                    prefixes::LOCAL_AUTHORITY_ENG,
                )
                .with_rename(register, fields::STATISTICAL_GEOGRAPHY)
                .with_ignore_superseded()
            })
            .collect()
    }

    /// Patch descriptors for the configured patch files, in order
    pub fn patch_sources(&self) -> Vec<SourceDescriptor> {
        self.patch_files
            .iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                SourceDescriptor::patch(name, path.clone())
            })
            .collect()
    }

    fn register_path(&self, register: &str) -> PathBuf {
        self.register_dir.join(format!("{}.csv", register))
    }
}
