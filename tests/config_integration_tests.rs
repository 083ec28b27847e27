//! Integration tests for config loading from fixture files.
//!
//! These tests verify that all config modules can parse the sample config file correctly.

use std::fs;
use std::path::Path;

/// Read the sample config file content.
fn read_sample_config() -> String {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    fs::read_to_string(config_path).expect("Failed to read sample config file")
}

#[test]
fn sample_config_file_exists() {
    let config_path = Path::new("tests/fixtures/sample_config.toml");
    assert!(config_path.exists(), "Sample config file should exist");
}

#[test]
fn sample_config_is_valid_toml() {
    let config_content = read_sample_config();
    let result: Result<toml::Value, _> = toml::from_str(&config_content);
    assert!(result.is_ok(), "Sample config should be valid TOML: {:?}", result.err());
}

#[test]
fn sample_config_has_all_sections() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let table = value.as_table().expect("should be a table");

    // Check all expected sections exist
    let expected_sections = ["mergeparts", "reorg"];

    for section in expected_sections {
        assert!(table.contains_key(section), "Config should have [{section}] section");
    }
}

#[test]
fn mergeparts_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let mergeparts = value.get("mergeparts").expect("should have mergeparts section");

    assert!(mergeparts.get("dryrun").is_some());
    assert!(mergeparts.get("verbose").is_some());
}

#[test]
fn reorg_section_has_expected_structure() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    let reorg = value.get("reorg").expect("should have reorg section");

    assert!(reorg.get("dryrun").is_some());
    assert!(reorg.get("split").is_some());
    assert!(reorg.get("log_file").is_some());
    assert!(reorg.get("verbose").is_some());
}

#[test]
fn sections_only_contain_boolean_and_string_values() {
    let config_content = read_sample_config();
    let value: toml::Value = toml::from_str(&config_content).expect("should parse");

    for (section_name, section) in value.as_table().expect("should be a table") {
        let table = section
            .as_table()
            .unwrap_or_else(|| panic!("[{section_name}] should be a table"));
        for (key, entry) in table {
            assert!(
                entry.is_bool() || entry.is_str(),
                "[{section_name}] {key} should be a boolean or string"
            );
        }
    }
}
