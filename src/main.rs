use clap::Parser;
use organisation_builder::cli::{args::Args, commands};
use organisation_builder::constants::EXIT_VALIDATION_FAILED;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(report) => {
            // The table is already published; validation errors only decide
            // the exit code.
            if report.diagnostics.is_ok() {
                process::exit(0);
            } else {
                process::exit(EXIT_VALIDATION_FAILED);
            }
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Organisation Builder - UK Public-Sector Organisation Table");
    println!("==========================================================");
    println!();
    println!("Merge GOV.UK registers, curated overrides and patch files into one");
    println!("canonical CSV table of UK public-sector organisations.");
    println!();
    println!("USAGE:");
    println!("    organisation-builder <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    build       Build, publish and validate the organisation table");
    println!("    validate    Validate a previously published organisation table");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Build the table from the default register directory:");
    println!("    organisation-builder build");
    println!();
    println!("    # Build with patch files and a custom output path:");
    println!("    organisation-builder build patches/dclg.csv patches/wikidata.csv \\");
    println!("                               --output collection/organisation.csv");
    println!();
    println!("    # Validate a published table:");
    println!("    organisation-builder validate collection/organisation.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    organisation-builder <COMMAND> --help");
}
