//! Report builders behind the tool surface. Every function returns a
//! human-readable string, on failure included: the boundary contract
//! guarantees a textual outcome for every call, so nothing here propagates an
//! error to the driving agent.

use crate::config::Settings;
use crate::generator::ArtifactGenerator;
use crate::process::launcher::ProcessLauncher;
use crate::process::progress::{table_progress, TableProgress};
use crate::study::import::list_candidate_outputs;
use crate::study::record::{InputSpec, StudyName, StudyStatus, UpsertOutcome};
use crate::study::store::StudyStore;
use std::path::Path;

fn parsed_name(raw: &str) -> Result<StudyName, String> {
    StudyName::parse(raw).map_err(|err| format!("Error: {err}"))
}

pub fn create_or_load(store: &StudyStore, raw_name: &str) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    match store.create_or_load(&name) {
        Ok(record) => match serde_json::to_string_pretty(&record) {
            Ok(body) => format!("Study '{}' is active. Current state:\n{body}", name.raw()),
            Err(err) => format!("Error: failed to render study record: {err}"),
        },
        Err(err) => format!("Error: {err}"),
    }
}

pub fn set_executable(store: &StudyStore, raw_name: &str, path: &str) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    match store.set_executable_path(&name, path) {
        Ok(_) => format!("Executable path set to: {path}"),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn add_input(store: &StudyStore, raw_name: &str, input: InputSpec) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    let input_name = input.name.clone();
    match store.upsert_input(&name, input) {
        Ok(UpsertOutcome::Updated) => format!("Updated existing input '{input_name}'."),
        Ok(UpsertOutcome::Inserted) => format!("Added new input '{input_name}'."),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn import_inputs(store: &StudyStore, raw_name: &str, source: &Path) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    match store.import_inputs(&name, source) {
        Ok(report) => format!(
            "Successfully imported {} inputs from {}.",
            report.imported,
            source.display()
        ),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn list_outputs(source: &Path) -> String {
    match list_candidate_outputs(source) {
        Ok(outputs) if outputs.is_empty() => {
            format!("No candidate outputs found in {}.", source.display())
        }
        Ok(outputs) => format!(
            "Found the following outputs in {}:\n{}\n\nCall study.set_outputs with the subset to keep.",
            source.display(),
            outputs.join("\n")
        ),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn set_outputs(store: &StudyStore, raw_name: &str, selected: &[String]) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    match store.union_outputs(&name, selected) {
        Ok(outputs) => format!("Updated study outputs. Current list: [{}]", outputs.join(", ")),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn status(store: &StudyStore, raw_name: &str) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    match store.status(&name) {
        Ok(status) => render_status(&status),
        Err(err) => format!("Error: {err}"),
    }
}

fn render_status(status: &StudyStatus) -> String {
    let mut report = Vec::new();
    report.push(format!("--- Status for Study: {} ---", status.study_name));

    if status.executable_set() {
        report.push(format!(
            "[OK] Executable path set: {}",
            status.executable_path
        ));
    } else {
        report.push("[MISSING] Executable path is empty.".to_string());
    }

    if status.input_count > 0 {
        report.push(format!("[OK] {} inputs defined.", status.input_count));
    } else {
        report.push("[MISSING] No inputs defined.".to_string());
    }

    if status.output_count > 0 {
        report.push(format!(
            "[OK] {} outputs defined: {}",
            status.output_count,
            status.outputs.join(", ")
        ));
    } else {
        report.push("[MISSING] No outputs defined.".to_string());
    }

    if status.is_valid() {
        report.push("\nRESULT: Study is VALID and ready.".to_string());
    } else {
        report.push("\nRESULT: Study is INCOMPLETE.".to_string());
    }
    report.join("\n")
}

pub fn build_artifact(
    store: &StudyStore,
    generator: &ArtifactGenerator,
    raw_name: &str,
    artifact_path: &Path,
) -> String {
    let name = match parsed_name(raw_name) {
        Ok(name) => name,
        Err(report) => return report,
    };
    let record = match store.load(&name) {
        Ok(record) => record,
        Err(err) => return format!("Error: {err}"),
    };
    match generator.write_artifact(&record, artifact_path) {
        Ok(()) => format!(
            "Artifact for study '{}' written to {}.",
            name.raw(),
            artifact_path.display()
        ),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn run_artifact(launcher: &ProcessLauncher, artifact_path: &Path) -> String {
    match launcher.launch_artifact(artifact_path) {
        Ok(pid) => format!(
            "Study run launched with pid {pid}. Combined output is logged to {}.",
            launcher.run_log_path().display()
        ),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn stop_run(launcher: &ProcessLauncher, pid: u32) -> String {
    match launcher.stop(pid) {
        Ok(report) if report.forced => {
            format!("Process {pid} did not exit on TERM and was killed.")
        }
        Ok(_) => format!("Process {pid} stopped."),
        Err(err) => format!("Error: {err}"),
    }
}

pub fn progress(result_table: &Path) -> String {
    match table_progress(result_table) {
        Ok(TableProgress::NotStarted) => format!(
            "Not started: no result table at {} yet (0 rows).",
            result_table.display()
        ),
        Ok(TableProgress::Rows(rows)) => {
            format!("{rows} sample rows written to {}.", result_table.display())
        }
        Err(err) => format!("Error: {err}"),
    }
}

pub fn launch_visualizer(launcher: &ProcessLauncher, settings: &Settings) -> String {
    let table = settings.result_table_path();
    match launcher.launch_visualizer(&settings.visualizer.command, &table) {
        Ok(pid) => format!(
            "Visualizer launched with pid {pid}, watching {}.",
            table.display()
        ),
        Err(err) => format!("Error: {err}"),
    }
}
