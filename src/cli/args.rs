//! Command-line argument definitions for the organisation builder
//!
//! Defines the CLI interface using the clap derive API: a `build` command
//! running the full seed/patch/publish/validate pipeline, and a `validate`
//! command checking a previously published table.

use crate::config::PipelineConfig;
use crate::constants::{
    DEFAULT_ORGANISATION_CSV, DEFAULT_OUTPUT_PATH, DEFAULT_PATCH_PASSES, DEFAULT_REGISTER_DIR,
    MIN_PATCH_PASSES,
};
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the organisation builder
///
/// Reconciles UK public-sector organisation registers, curated overrides and
/// patch files into a single canonical organisation table.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "organisation-builder",
    version,
    about = "Build a canonical table of UK public-sector organisations from registers and patches",
    long_about = "Merges GOV.UK register files, curated overrides and patch CSVs into one \
                  canonical organisation table. Every organisation is keyed by a CURIE \
                  identifier, fields merge first-write-wins in source order, and the published \
                  table is validated against category-specific rules."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Build, publish and validate the organisation table (default command)
    Build(BuildArgs),
    /// Validate a previously published organisation table
    Validate(ValidateArgs),
}

/// Arguments for the build command
#[derive(Debug, Clone, Parser)]
pub struct BuildArgs {
    /// Patch CSV files applied after seeding, in the order given
    ///
    /// Each patch file is tried against every join key; rows matching an
    /// existing organisation fill its empty fields.
    #[arg(value_name = "PATCH", help = "Patch CSV files to apply, in order")]
    pub patch_files: Vec<PathBuf>,

    /// Directory holding collected register CSV files
    ///
    /// Must contain local-authority-eng.csv, government-organisation.csv and
    /// the statistical-geography-*.csv registers.
    #[arg(
        short = 'r',
        long = "register-dir",
        value_name = "DIR",
        default_value = DEFAULT_REGISTER_DIR,
        help = "Directory holding collected register CSV files"
    )]
    pub register_dir: PathBuf,

    /// Curated organisation override file
    ///
    /// Seeds organisations missing from the registers; its key column
    /// carries full identifiers.
    #[arg(
        long = "organisation-csv",
        value_name = "FILE",
        default_value = DEFAULT_ORGANISATION_CSV,
        help = "Curated organisation override file"
    )]
    pub organisation_csv: PathBuf,

    /// Number of merge passes over the patch files
    ///
    /// A patch can supply the very field another patch joins on, so at least
    /// two passes are required for the merge to converge.
    #[arg(
        long = "passes",
        value_name = "COUNT",
        default_value_t = DEFAULT_PATCH_PASSES,
        help = "Number of merge passes over the patch files"
    )]
    pub passes: usize,

    /// Output path for the published table
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Output path for the published organisation table"
    )]
    pub output_path: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Published organisation table to validate
    #[arg(
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Published organisation table to validate"
    )]
    pub input_path: PathBuf,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl BuildArgs {
    /// Validate the build arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.register_dir.exists() {
            return Err(Error::configuration(format!(
                "register directory does not exist: {}",
                self.register_dir.display()
            )));
        }

        if !self.register_dir.is_dir() {
            return Err(Error::configuration(format!(
                "register path is not a directory: {}",
                self.register_dir.display()
            )));
        }

        if self.passes < MIN_PATCH_PASSES {
            return Err(Error::configuration(format!(
                "at least {} merge passes are required, got {}",
                MIN_PATCH_PASSES, self.passes
            )));
        }

        for patch in &self.patch_files {
            if !patch.exists() {
                return Err(Error::configuration(format!(
                    "patch file does not exist: {}",
                    patch.display()
                )));
            }
        }

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(Error::configuration(format!(
                    "output directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Translate the arguments into a pipeline configuration
    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_register_dir(self.register_dir.clone())
            .with_organisation_csv(self.organisation_csv.clone())
            .with_patch_files(self.patch_files.clone())
            .with_patch_passes(self.passes)
            .with_output_path(self.output_path.clone())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ValidateArgs {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            return Err(Error::configuration(format!(
                "organisation table does not exist: {}",
                self.input_path.display()
            )));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
