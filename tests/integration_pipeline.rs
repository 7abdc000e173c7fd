//! Integration tests for the full build pipeline
//!
//! These tests lay out a miniature collection on disk — registers, a curated
//! override file and patch files — then run the same seed/patch/publish/
//! validate sequence the build command executes, checking the published
//! table end to end.

use organisation_builder::app::services::publisher;
use organisation_builder::app::services::source_adapter::load_source;
use organisation_builder::app::services::validator;
use organisation_builder::{OrganisationRegistry, PipelineConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write one file of the fixture collection
fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Lay out a small but complete collection and return its configuration.
///
/// Three local authorities (a metropolitan district, a non-metropolitan
/// district and a combined authority), one central government body and one
/// waste authority; cross-references arrive through two patch files whose
/// join keys depend on each other, so convergence needs both passes.
fn setup_collection(temp_dir: &TempDir) -> PipelineConfig {
    let root = temp_dir.path();
    let registers = root.join("register");

    write_file(
        &registers.join("local-authority-eng.csv"),
        "local-authority-eng,name,official-name,local-authority-type,website,start-date,end-date\n\
         BIR,Birmingham,Birmingham City Council,MD,https://www.birmingham.gov.uk,1974-04-01T00:00:00Z,\n\
         CAM,Cambridge,Cambridge City Council,NMD,https://www.cambridge.gov.uk,,\n\
         WMCA,West Midlands Combined Authority,,COMB,https://www.wmca.org.uk,2016-06-17,\n",
    );

    write_file(
        &registers.join("government-organisation.csv"),
        "government-organisation,name,website\n\
         D4,Ministry of Housing Communities and Local Government,https://www.gov.uk/mhclg\n",
    );

    // the metropolitan district register carries history; only the current
    // code may reach the table
    write_file(
        &registers.join("statistical-geography-metropolitan-district-eng.csv"),
        "local-authority-eng,statistical-geography-metropolitan-district-eng,end-date\n\
         BIR,E08000028,1974-04-01\n\
         BIR,E08000025,\n",
    );
    write_file(
        &registers.join("statistical-geography-non-metropolitan-district-eng.csv"),
        "local-authority-eng,statistical-geography-non-metropolitan-district-eng,end-date\n\
         CAM,E07000008,\n",
    );
    for empty in [
        "statistical-geography-county-eng",
        "statistical-geography-london-borough-eng",
        "statistical-geography-unitary-authority-eng",
    ] {
        write_file(
            &registers.join(format!("{}.csv", empty)),
            &format!("local-authority-eng,{},end-date\n", empty),
        );
    }

    write_file(
        &root.join("organisation.csv"),
        "organisation,name,wikidata,government-organisation,website\n\
         government-organisation:D4,,Q601819,D4,\n\
         waste-authority:Q21921612,North London Waste Authority,Q21921612,,https://www.nlwa.gov.uk\n",
    );

    // links joins on statistical-geography; the combined authority's code
    // only arrives through the geographies patch below, so this source needs
    // the second pass to finish
    write_file(
        &root.join("links.csv"),
        "statistical-geography,opendatacommunities,opendatacommunities-area\n\
         E08000025,http://opendatacommunities.org/id/metropolitan-district-council/birmingham,http://statistics.data.gov.uk/id/statistical-geography/E08000025\n\
         E07000008,http://opendatacommunities.org/id/non-metropolitan-district-council/cambridge,http://statistics.data.gov.uk/id/statistical-geography/E07000008\n\
         E47000007,http://opendatacommunities.org/id/combined-authority/west-midlands,http://statistics.data.gov.uk/id/statistical-geography/E47000007\n",
    );
    write_file(
        &root.join("geographies.csv"),
        "name,statistical-geography,wikidata\n\
         Birmingham City Council,,Q26732\n\
         Cambridge City Council,,Q1093625\n\
         West Midlands Combined Authority,E47000007,Q19843406\n",
    );

    PipelineConfig::default()
        .with_register_dir(registers)
        .with_organisation_csv(root.join("organisation.csv"))
        .with_patch_files(vec![root.join("links.csv"), root.join("geographies.csv")])
        .with_output_path(root.join("organisation-out.csv"))
}

/// Run the build command's seed/patch plan against a configuration
fn build(config: &PipelineConfig) -> OrganisationRegistry {
    let mut registry = OrganisationRegistry::new();

    registry.seed(&load_source(&config.local_authority_register()).unwrap());
    registry.seed(&load_source(&config.curated_organisations()).unwrap());

    let government = load_source(&config.government_organisation_register()).unwrap();
    registry.patch(&government.rows, "government-organisation");

    for descriptor in config.statistical_geography_registers() {
        registry.seed(&load_source(&descriptor).unwrap());
    }

    registry.finalise();

    let patches: Vec<_> = config
        .patch_sources()
        .iter()
        .map(|descriptor| load_source(descriptor).unwrap())
        .collect();
    let join_keys: Vec<&str> = config.patch_join_keys.iter().map(String::as_str).collect();
    let stats = registry.run_patch_passes(&patches, &join_keys, config.patch_passes);
    assert!(stats.converged(), "probe pass still filled fields");

    registry.normalise_dates();

    registry
}

#[test]
fn test_full_build_publishes_clean_table() {
    let temp_dir = TempDir::new().unwrap();
    let config = setup_collection(&temp_dir);
    config.validate().unwrap();

    let registry = build(&config);
    publisher::publish_to_path(&registry, &config.output_path).unwrap();

    let output = fs::read_to_string(&config.output_path).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    // header first, then one row per organisation in identifier order
    assert!(lines[0].starts_with("organisation,wikidata,name,website,"));
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("government-organisation:D4,"));
    assert!(lines[2].starts_with("local-authority-eng:BIR,"));
    assert!(lines[3].starts_with("local-authority-eng:CAM,"));
    assert!(lines[4].starts_with("local-authority-eng:WMCA,"));
    assert!(lines[5].starts_with("waste-authority:Q21921612,"));

    let diagnostics = validator::validate(&registry);
    assert_eq!(diagnostics.error_count(), 0, "{:?}", diagnostics.errors);
    assert_eq!(diagnostics.warning_count(), 0, "{:?}", diagnostics.warnings);
}

#[test]
fn test_merged_record_details() {
    let temp_dir = TempDir::new().unwrap();
    let config = setup_collection(&temp_dir);

    let registry = build(&config);

    // official-name preferred, timestamp suffix stripped, history filtered,
    // wikidata joined through the name key
    let bir = registry.get(&"local-authority-eng:BIR".into()).unwrap();
    assert_eq!(bir.name(), "Birmingham City Council");
    assert_eq!(bir.start_date(), "1974-04-01");
    assert_eq!(bir.statistical_geography(), "E08000025");
    assert_eq!(bir.get("wikidata"), Some("Q26732"));

    // the government register patched the curated record
    let mhclg = registry.get(&"government-organisation:D4".into()).unwrap();
    assert_eq!(
        mhclg.name(),
        "Ministry of Housing Communities and Local Government"
    );
    assert_eq!(mhclg.get("website"), Some("https://www.gov.uk/mhclg"));

    // second-pass fill: the combined authority's cross-references joined on
    // the geography code another patch supplied
    let wmca = registry.get(&"local-authority-eng:WMCA".into()).unwrap();
    assert_eq!(wmca.statistical_geography(), "E47000007");
    assert_eq!(
        wmca.get("opendatacommunities"),
        Some("http://opendatacommunities.org/id/combined-authority/west-midlands")
    );
}

#[test]
fn test_published_table_revalidates_clean() {
    let temp_dir = TempDir::new().unwrap();
    let config = setup_collection(&temp_dir);

    let registry = build(&config);
    publisher::publish_to_path(&registry, &config.output_path).unwrap();

    // reload the published table the way the validate command does
    let descriptor = organisation_builder::app::services::source_adapter::SourceDescriptor::new(
        "organisation-table",
        config.output_path.clone(),
        "organisation",
    )
    .with_bare_identifiers();

    let source = load_source(&descriptor).unwrap();
    let mut reloaded = OrganisationRegistry::new();
    reloaded.seed(&source);

    assert_eq!(reloaded.len(), registry.len());
    let diagnostics = validator::validate(&reloaded);
    assert_eq!(diagnostics.error_count(), 0, "{:?}", diagnostics.errors);
}

#[test]
fn test_validation_failure_does_not_block_publication() {
    let temp_dir = TempDir::new().unwrap();
    let config = setup_collection(&temp_dir);

    // drop the patch carrying wikidata values; validation must fail but the
    // table is still published in full
    let config = config.with_patch_files(vec![temp_dir.path().join("links.csv")]);

    let mut registry = OrganisationRegistry::new();
    registry.seed(&load_source(&config.local_authority_register()).unwrap());
    registry.seed(&load_source(&config.curated_organisations()).unwrap());
    for descriptor in config.statistical_geography_registers() {
        registry.seed(&load_source(&descriptor).unwrap());
    }
    registry.finalise();
    registry.normalise_dates();

    publisher::publish_to_path(&registry, &config.output_path).unwrap();
    assert!(config.output_path.exists());

    let diagnostics = validator::validate(&registry);
    assert!(!diagnostics.is_ok());
    assert!(
        diagnostics
            .errors
            .iter()
            .any(|d| d.field == "wikidata" && d.message.contains("missing"))
    );
}

#[test]
fn test_extra_pass_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let config = setup_collection(&temp_dir);

    let two_passes = build(&config);
    let three_passes = build(&config.clone().with_patch_passes(3));

    assert_eq!(two_passes.len(), three_passes.len());
    for ((curie_a, org_a), (curie_b, org_b)) in two_passes.iter().zip(three_passes.iter()) {
        assert_eq!(curie_a, curie_b);
        assert_eq!(org_a, org_b);
    }
}
