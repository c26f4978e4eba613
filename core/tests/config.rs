//! Config loading and validation.

use opscenter_core::{config::SimConfig, engine::SimEngine, error::SimError};

const DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");

fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("opscenter-config-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn shipped_config_matches_defaults() {
    let config = SimConfig::load(DATA_DIR).expect("load data/ops_center.json");
    assert_eq!(config, SimConfig::default());
    assert_eq!(config.operator_names[0], "Alex Chen");
    assert_eq!(config.generation.max_open, 8);
    assert_eq!(config.timeout.max_unassigned_age_ms, 60_000);
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let dir = scratch_dir("partial");
    std::fs::write(dir.join("ops_center.json"), r#"{ "generation": { "probability": 0.5 } }"#).unwrap();

    let config = SimConfig::load(dir.to_str().unwrap()).unwrap();
    assert_eq!(config.generation.probability, 0.5);
    assert_eq!(config.generation.interval_ticks, 5);
    assert_eq!(config.operator_names.len(), 8);
    assert_eq!(config.skill_gain, 2);
}

#[test]
fn malformed_or_missing_files_are_errors() {
    let dir = scratch_dir("malformed");
    std::fs::write(dir.join("ops_center.json"), "{ not json").unwrap();
    assert!(SimConfig::load(dir.to_str().unwrap()).is_err());

    let empty = scratch_dir("empty");
    let _ = std::fs::remove_file(empty.join("ops_center.json"));
    let err = SimConfig::load(empty.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}

#[test]
fn roster_must_have_eight_names() {
    let mut config = SimConfig::default();
    config.operator_names.pop();

    assert!(matches!(config.validate(), Err(SimError::Config(_))));
    assert!(SimEngine::new("config-short".into(), 1, config).is_err());
}

#[test]
fn zero_interval_and_bad_probability_are_rejected() {
    let mut config = SimConfig::default();
    config.timeout.sweep_interval_ticks = 0;
    assert!(config.validate().is_err());

    let mut config = SimConfig::default();
    config.generation.probability = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn custom_names_reach_the_roster() {
    let mut config = SimConfig::default();
    config.operator_names = (1..=8).map(|n| format!("Night Shift {n}")).collect();

    let engine = SimEngine::new("config-names".into(), 9, config).unwrap();
    let names: Vec<&str> = engine.operators().iter().map(|op| op.name.as_str()).collect();
    assert_eq!(names[0], "Night Shift 1");
    assert_eq!(names[7], "Night Shift 8");
    assert_eq!(engine.config().operator_names.len(), 8);
}
