use std::fs;
use studyforge::config::{RunSettings, Settings};
use studyforge::generator::ArtifactGenerator;
use studyforge::process::launcher::ProcessLauncher;
use studyforge::server::{catalog, reports};
use studyforge::study::record::InputSpec;
use studyforge::study::store::StudyStore;
use tempfile::tempdir;

fn input(name: &str, lower: f64, upper: f64) -> InputSpec {
    InputSpec {
        name: name.to_string(),
        lower_bound: lower,
        upper_bound: upper,
    }
}

#[test]
fn the_catalog_covers_the_whole_tool_surface() {
    let ids = catalog::tool_ids();
    assert_eq!(ids.len(), 12);
    for id in [
        "study.create_or_load",
        "study.set_executable",
        "study.add_input",
        "study.import_inputs",
        "study.list_outputs",
        "study.set_outputs",
        "study.status",
        "study.build_artifact",
        "study.run_artifact",
        "study.stop_run",
        "study.progress",
        "study.launch_visualizer",
    ] {
        assert!(ids.contains(&id), "missing tool id {id}");
    }
}

#[test]
fn create_or_load_reports_the_current_record() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));

    let report = reports::create_or_load(&store, "demo");
    assert!(report.contains("Study 'demo' is active."));
    assert!(report.contains("\"study_name\": \"demo\""));
    assert!(report.contains("\"executable_path\": \"\""));
}

#[test]
fn status_report_marks_missing_pieces_and_the_verdict() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));

    let incomplete = reports::status(&store, "demo");
    assert!(incomplete.contains("[MISSING] Executable path is empty."));
    assert!(incomplete.contains("[MISSING] No inputs defined."));
    assert!(incomplete.contains("[MISSING] No outputs defined."));
    assert!(incomplete.contains("RESULT: Study is INCOMPLETE."));

    reports::set_executable(&store, "demo", "/opt/solver");
    let name = studyforge::study::record::StudyName::parse("demo").expect("name");
    store
        .upsert_input(&name, input("speed", 0.0, 5.0))
        .expect("input");
    store
        .union_outputs(&name, &["cost".to_string()])
        .expect("outputs");

    let valid = reports::status(&store, "demo");
    assert!(valid.contains("[OK] Executable path set: /opt/solver"));
    assert!(valid.contains("[OK] 1 inputs defined."));
    assert!(valid.contains("[OK] 1 outputs defined: cost"));
    assert!(valid.contains("RESULT: Study is VALID and ready."));
}

#[test]
fn failures_come_back_as_report_text_never_as_errors() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let launcher = ProcessLauncher::new(dir.path());

    // unusable study name
    let report = reports::create_or_load(&store, "///");
    assert!(report.starts_with("Error:"));

    // missing import source
    let report = reports::import_inputs(&store, "demo", &dir.path().join("absent.csv"));
    assert!(report.starts_with("Error:"));
    assert!(report.contains("not found"));

    // missing artifact
    let report = reports::run_artifact(&launcher, &dir.path().join("absent.py"));
    assert!(report.starts_with("Error:"));
    assert!(report.contains("artifact not found"));
}

#[test]
fn partial_import_report_names_the_offending_row() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let csv_path = dir.path().join("inputs.csv");
    fs::write(
        &csv_path,
        "name,lower_bound,upper_bound\nalpha,0,1\nbeta,2,notanumber\n",
    )
    .expect("write csv");

    let report = reports::import_inputs(&store, "demo", &csv_path);
    assert!(report.starts_with("Error:"));
    assert!(report.contains("beta"));
    assert!(report.contains("kept"));
}

#[test]
fn build_artifact_report_names_the_written_path() {
    let dir = tempdir().expect("tempdir");
    let store = StudyStore::new(dir.path().join("studies"));
    let generator = ArtifactGenerator::new(RunSettings::default());
    let name = studyforge::study::record::StudyName::parse("demo").expect("name");
    store
        .upsert_input(&name, input("speed", 0.0, 5.0))
        .expect("input");
    store
        .union_outputs(&name, &["cost".to_string()])
        .expect("outputs");

    let artifact = dir.path().join("demo_study.py");
    let report = reports::build_artifact(&store, &generator, "demo", &artifact);
    assert!(report.contains("written to"));
    assert!(artifact.exists());
}

#[test]
fn progress_report_distinguishes_not_started_from_counted_rows() {
    let dir = tempdir().expect("tempdir");
    let table = dir.path().join("output.csv");

    let report = reports::progress(&table);
    assert!(report.contains("Not started"));
    assert!(report.contains("0 rows"));

    fs::write(&table, "a,b\n1,2\n3,4\n").expect("write table");
    let report = reports::progress(&table);
    assert!(report.contains("2 sample rows"));
}

#[test]
fn visualizer_report_reflects_spawn_failures_textually() {
    let dir = tempdir().expect("tempdir");
    let launcher = ProcessLauncher::new(dir.path());
    let mut settings = Settings::with_state_root(dir.path());
    settings.visualizer.command = vec!["studyforge-no-such-binary".to_string()];

    let report = reports::launch_visualizer(&launcher, &settings);
    assert!(report.starts_with("Error:"));
}
