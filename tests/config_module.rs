use std::fs;
use studyforge::config::{ConfigError, RunSettings, Settings, VisualizerSettings};
use tempfile::tempdir;

#[test]
fn defaults_cover_the_whole_run_shape() {
    let settings = Settings::with_state_root("/var/lib/studyforge");
    assert_eq!(settings.run.iterations, 20);
    assert_eq!(settings.run.delay_seconds, 1);
    assert_eq!(settings.run.result_table, "output.csv");
    assert_eq!(
        settings.visualizer.command,
        vec!["streamlit", "run", "dashboard.py"]
    );
    assert!(settings.validate().is_ok());
    assert!(settings.studies_dir().ends_with("studies"));
    assert!(settings.result_table_path().ends_with("output.csv"));
}

#[test]
fn yaml_settings_override_defaults_and_partial_files_backfill() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "state_root: /var/lib/studyforge\nrun:\n  iterations: 50\n  result_table: samples.csv\n",
    )
    .expect("write yaml");

    let settings = Settings::from_path(&path).expect("parse");
    assert_eq!(settings.run.iterations, 50);
    assert_eq!(settings.run.result_table, "samples.csv");
    // unspecified fields keep their defaults
    assert_eq!(settings.run.delay_seconds, 1);
    assert_eq!(settings.visualizer, VisualizerSettings::default());
    assert!(settings.validate().is_ok());
}

#[test]
fn invalid_yaml_reports_the_offending_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.yaml");
    fs::write(&path, "state_root: [not\n  a: path\n").expect("write yaml");

    let err = Settings::from_path(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn zero_iterations_fail_validation() {
    let mut settings = Settings::with_state_root("/var/lib/studyforge");
    settings.run = RunSettings {
        iterations: 0,
        ..RunSettings::default()
    };
    let err = settings.validate().expect_err("should fail");
    assert!(err.to_string().contains("iterations"));
}
