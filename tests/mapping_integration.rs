use std::fs;
use std::path::Path;

use tempfile::TempDir;

use controlmap::config::{DatasetConfig, MapperConfig};
use controlmap::models::CoverageMode;
use controlmap::{build_mapper, load_controls, load_mappings, ControlMapper};

const NIST_CSV: &str = "\
id,name,description
AC-2,Account Management,Manage system accounts
AC-3,Access Enforcement,Enforce approved authorizations
AU-6,Audit Record Review,
IA-2,Identification and Authentication,Uniquely identify users
";

const ISO_CSV: &str = "\
id,name,description
A.9.2.1,User registration and de-registration,
A.9.4.1,Information access restriction,
A.12.4.1,Event logging,
";

const SOC2_CSV: &str = "\
id,name
CC6.1,Logical and physical access controls
CC6.2,User registration and authorization
";

const MAPPINGS_CSV: &str = "\
source_framework,source_id,target_framework,target_id,relationship
NIST800-53,AC-2,ISO27001,A.9.2.1,equivalent
NIST800-53,AC-2,SOC2,CC6.2,partial
NIST800-53,AC-3,ISO27001,A.9.4.1,equivalent
NIST800-53,AU-6,ISO27001,A.12.4.2,related
NIST800-53,IA-2,SOC2,CC6.1,
ISO27001,A.9.2.1,NIST800-53,AC-2,equivalent
";

fn write_fixture(dir: &Path) {
    fs::write(dir.join("nist80053_controls.csv"), NIST_CSV).unwrap();
    fs::write(dir.join("iso27001_controls.csv"), ISO_CSV).unwrap();
    fs::write(dir.join("soc2_controls.csv"), SOC2_CSV).unwrap();
    fs::write(dir.join("mappings.csv"), MAPPINGS_CSV).unwrap();
}

fn setup_mapper() -> (TempDir, ControlMapper) {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    let mapper = build_mapper(&MapperConfig::with_data_dir(tmp.path())).unwrap();
    (tmp, mapper)
}

#[test]
fn map_control_resolves_targets_in_input_order() {
    let (_tmp, mapper) = setup_mapper();

    let results = mapper.map_control("NIST800-53", "AC-2");
    let targets: Vec<String> = results
        .iter()
        .map(|(m, t)| format!("{} {} ({})", t.framework, t.id, m.relationship))
        .collect();

    assert_eq!(
        targets,
        vec!["ISO27001 A.9.2.1 (equivalent)", "SOC2 CC6.2 (partial)"]
    );
}

#[test]
fn map_control_drops_unloaded_target() {
    let (_tmp, mapper) = setup_mapper();

    // AU-6 only maps to A.12.4.2, which is not in the ISO catalogue
    assert!(mapper.map_control("NIST800-53", "AU-6").is_empty());
}

#[test]
fn blank_relationship_defaults_to_related() {
    let (_tmp, mapper) = setup_mapper();

    let results = mapper.map_control("NIST800-53", "IA-2");
    assert_eq!(results.len(), 1);
    assert!(results[0].0.relationship.is_related());
}

#[test]
fn map_framework_lists_only_controls_with_resolved_targets() {
    let (_tmp, mapper) = setup_mapper();

    let results = mapper.map_framework("NIST800-53", "ISO27001");
    let sources: Vec<&str> = results.iter().map(|(c, _)| c.id.as_str()).collect();
    assert_eq!(sources, vec!["AC-2", "AC-3"]);

    for (_, mapped) in &results {
        assert!(mapped.iter().all(|(m, _)| m.target_framework == "ISO27001"));
    }

    let soc2_results = mapper.map_framework("NIST800-53", "SOC2");
    let soc2: Vec<&str> = soc2_results.iter().map(|(c, _)| c.id.as_str()).collect();
    assert_eq!(soc2, vec!["AC-2", "IA-2"]);
}

#[test]
fn coverage_counts_raw_mappings() {
    let (_tmp, mapper) = setup_mapper();

    // AC-2, AC-3 and AU-6 map to ISO; AU-6's target is not loaded
    let report = mapper.get_coverage("NIST800-53", "ISO27001");
    assert_eq!(report.total_controls, 4);
    assert_eq!(report.mapped_controls, 3);
    assert_eq!(report.coverage_percent, 75.0);

    let report = mapper.get_coverage("ISO27001", "NIST800-53");
    assert_eq!(report.total_controls, 3);
    assert_eq!(report.mapped_controls, 1);
    assert_eq!(report.coverage_percent, 33.33);
}

#[test]
fn coverage_with_resolved_targets_mode() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    let config =
        MapperConfig::with_data_dir(tmp.path()).with_coverage_mode(CoverageMode::ResolvedTargets);
    let mapper = build_mapper(&config).unwrap();

    let report = mapper.get_coverage("NIST800-53", "ISO27001");
    assert_eq!(report.mapped_controls, 2);
    assert_eq!(report.coverage_percent, 50.0);
}

#[test]
fn unknown_framework_yields_empty_results() {
    let (_tmp, mapper) = setup_mapper();

    assert!(mapper.map_control("PCI-DSS", "1.1").is_empty());
    assert!(mapper.map_framework("PCI-DSS", "ISO27001").is_empty());
    assert!(mapper.map_framework("NIST800-53", "PCI-DSS").is_empty());

    let report = mapper.get_coverage("PCI-DSS", "ISO27001");
    assert_eq!(report.total_controls, 0);
    assert_eq!(report.mapped_controls, 0);
    assert_eq!(report.coverage_percent, 0.0);
}

#[test]
fn missing_framework_file_is_skipped() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    fs::remove_file(tmp.path().join("soc2_controls.csv")).unwrap();

    let mapper = build_mapper(&MapperConfig::with_data_dir(tmp.path())).unwrap();

    // SOC 2 targets no longer resolve, but mappings into SOC 2 still count
    assert!(mapper.map_framework("NIST800-53", "SOC2").is_empty());
    assert_eq!(mapper.get_coverage("NIST800-53", "SOC2").mapped_controls, 2);
    assert_eq!(mapper.controls().framework_len("SOC2"), 0);
}

#[test]
fn duplicate_controls_across_datasets_keep_last_loaded() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());
    let revised = tmp.path().join("iso_revised.csv");
    fs::write(&revised, "id,name\nA.9.2.1,User registration (2022 revision)\n").unwrap();

    // Both datasets are stamped ISO27001; the second one is loaded later
    let mut config = MapperConfig::with_data_dir(tmp.path());
    config
        .datasets
        .push(DatasetConfig::new("ISO27001", revised));
    let mapper = build_mapper(&config).unwrap();

    let results = mapper.map_control("NIST800-53", "AC-2");
    assert_eq!(results[0].1.name, "User registration (2022 revision)");
    assert_eq!(mapper.controls().framework_len("ISO27001"), 3);
    assert_eq!(mapper.stats().replaced_controls, 1);
}

#[test]
fn loaders_report_missing_sources() {
    let tmp = TempDir::new().unwrap();

    let err = load_controls(tmp.path().join("nope.csv"), "NIST800-53").unwrap_err();
    assert!(err.is_source_unavailable());

    let err = load_mappings(tmp.path().join("nope.csv")).unwrap_err();
    assert!(err.is_source_unavailable());
}

#[test]
fn json_config_drives_session() {
    let tmp = TempDir::new().unwrap();
    write_fixture(tmp.path());

    let config_path = tmp.path().join("controlmap.json");
    let config = MapperConfig::new(
        vec![
            DatasetConfig::new("NIST800-53", tmp.path().join("nist80053_controls.csv")),
            DatasetConfig::new("ISO27001", tmp.path().join("iso27001_controls.csv")),
        ],
        tmp.path().join("mappings.csv"),
    );
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = MapperConfig::from_json_file(&config_path).unwrap();
    assert_eq!(loaded, config);

    let mapper = build_mapper(&loaded).unwrap();
    assert_eq!(mapper.controls().len(), 7);
    assert_eq!(mapper.mappings().len(), 6);
}
