//! Command implementations for the organisation builder CLI
//!
//! This module contains the command execution logic, progress reporting,
//! and the end-of-run validation summary.

use crate::app::services::publisher;
use crate::app::services::registry::OrganisationRegistry;
use crate::app::services::source_adapter::{LoadedSource, SourceDescriptor, load_source};
use crate::app::services::validator::{self, Diagnostics};
use crate::cli::args::{Args, BuildArgs, Commands, ValidateArgs};
use crate::config::PipelineConfig;
use crate::constants::fields;
use crate::Result;
use colored::Colorize;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of a command run, reported to the caller for exit-code handling
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Organisations in the table when validation ran
    pub organisations: usize,

    /// Validation diagnostics; errors here decide the process exit code
    pub diagnostics: Diagnostics,
}

/// Main command runner
///
/// Dispatches to the requested subcommand. The returned report carries the
/// validation outcome; translating errors into the exit code is left to the
/// binary so the table is always published before the process fails.
pub fn run(args: Args) -> Result<RunReport> {
    match args.command {
        Some(Commands::Build(build_args)) => run_build(&build_args),
        Some(Commands::Validate(validate_args)) => run_validate(&validate_args),
        None => unreachable!("main shows help when no subcommand is given"),
    }
}

/// Execute the build command: seed, patch, publish, validate
pub fn run_build(args: &BuildArgs) -> Result<RunReport> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("starting organisation build");
    debug!("command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config();
    config.validate()?;

    let registry = build_registry(&config, args.show_progress())?;

    // publish before validating: diagnosable output beats no output
    let publish_stats = publisher::publish_to_path(&registry, &config.output_path)?;

    let diagnostics = validator::validate(&registry);

    if !args.quiet {
        print_summary(
            &diagnostics,
            publish_stats.rows_written,
            start_time.elapsed(),
        );
    }

    Ok(RunReport {
        organisations: publish_stats.rows_written,
        diagnostics,
    })
}

/// Execute the validate command against a previously published table
pub fn run_validate(args: &ValidateArgs) -> Result<RunReport> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;
    args.validate()?;

    let descriptor = SourceDescriptor::new(
        "organisation-table",
        args.input_path.clone(),
        fields::ORGANISATION,
    )
    .with_bare_identifiers();

    let source = load_source(&descriptor)?;
    let mut registry = OrganisationRegistry::new();
    registry.seed(&source);

    let diagnostics = validator::validate(&registry);

    if !args.quiet {
        print_summary(&diagnostics, registry.len(), start_time.elapsed());
    }

    Ok(RunReport {
        organisations: registry.len(),
        diagnostics,
    })
}

/// Run the full seed and patch plan, returning the merged table
fn build_registry(config: &PipelineConfig, show_progress: bool) -> Result<OrganisationRegistry> {
    let geography_registers = config.statistical_geography_registers();
    let patch_descriptors = config.patch_sources();

    // seed registers + curated file + government patch + geography registers
    let total_sources = 3 + geography_registers.len() + patch_descriptors.len();

    let progress_bar = if show_progress {
        let pb = ProgressBar::new(total_sources as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Loading sources...");
        Some(pb)
    } else {
        None
    };

    let tick = |pb: &Option<ProgressBar>, message: &str| {
        if let Some(pb) = pb {
            pb.set_message(message.to_string());
            pb.inc(1);
        }
    };

    let mut registry = OrganisationRegistry::new();

    let local_authorities = load_source(&config.local_authority_register())?;
    registry.seed(&local_authorities);
    tick(&progress_bar, "Seeded local authorities");

    let curated = load_source(&config.curated_organisations())?;
    registry.seed(&curated);
    tick(&progress_bar, "Seeded curated organisations");

    let government = load_source(&config.government_organisation_register())?;
    registry.patch(&government.rows, "government-organisation");
    tick(&progress_bar, "Patched government organisations");

    for descriptor in &geography_registers {
        let register = load_source(descriptor)?;
        registry.seed(&register);
        tick(&progress_bar, &format!("Seeded {}", descriptor.name));
    }

    registry.finalise();

    let mut patch_sources: Vec<LoadedSource> = Vec::with_capacity(patch_descriptors.len());
    for descriptor in &patch_descriptors {
        patch_sources.push(load_source(descriptor)?);
        tick(&progress_bar, &format!("Loaded {}", descriptor.name));
    }

    let join_keys: Vec<&str> = config.patch_join_keys.iter().map(String::as_str).collect();
    let pass_stats = registry.run_patch_passes(&patch_sources, &join_keys, config.patch_passes);

    // patch sources carry xsd:dateTime lifecycle values, so the suffix
    // strip has to wait until they have all been applied
    registry.normalise_dates();

    info!(
        "merge complete: {} organisations, {} fields filled by patches, converged: {}",
        registry.len(),
        pass_stats.total_fills(),
        pass_stats.converged()
    );

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Merge complete");
    }

    Ok(registry)
}

/// Set up structured logging on stderr
fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("organisation_builder={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("logging initialized at level: {}", log_level);
    Ok(())
}

/// Print the end-of-run validation summary
fn print_summary(diagnostics: &Diagnostics, organisations: usize, elapsed: std::time::Duration) {
    println!();
    println!(
        "{} organisations in {}",
        organisations,
        HumanDuration(elapsed)
    );

    for warning in &diagnostics.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    for error in &diagnostics.errors {
        println!("{} {}", "error:".red().bold(), error);
    }

    if diagnostics.is_ok() && diagnostics.warning_count() == 0 {
        println!("{}", "validation passed".green().bold());
    } else {
        println!(
            "{} errors, {} warnings",
            diagnostics.error_count().to_string().red().bold(),
            diagnostics.warning_count().to_string().yellow().bold()
        );
    }
}
