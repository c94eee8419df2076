pub mod formula;
pub(crate) mod template;

pub use formula::{OutputFormula, ScaledSumFormula};

use crate::config::RunSettings;
use crate::generator::template::{py_str, render_template, ARTIFACT_TEMPLATE};
use crate::study::record::StudyRecord;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("unclosed placeholder in artifact template")]
    UnclosedPlaceholder,
    #[error("empty placeholder in artifact template")]
    EmptyPlaceholder,
    #[error("unknown placeholder `{0}` in artifact template")]
    UnknownPlaceholder(String),
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Compiles a study record into a standalone Python sampling driver. The
/// generator does not enforce record validity; callers decide whether an
/// incomplete study is worth compiling.
pub struct ArtifactGenerator {
    run: RunSettings,
    formula: Box<dyn OutputFormula>,
}

impl ArtifactGenerator {
    pub fn new(run: RunSettings) -> Self {
        Self::with_formula(run, Box::new(ScaledSumFormula))
    }

    pub fn with_formula(run: RunSettings, formula: Box<dyn OutputFormula>) -> Self {
        Self { run, formula }
    }

    /// Renders the artifact source: header = inputs then outputs in stored
    /// order, one uniform sampling line per input, one formula line per
    /// output.
    pub fn compose(&self, record: &StudyRecord) -> Result<String, GeneratorError> {
        let headers = record
            .inputs
            .iter()
            .map(|input| py_str(&input.name))
            .chain(record.outputs.iter().map(|output| py_str(output)))
            .collect::<Vec<_>>()
            .join(", ");

        let sample_lines = record
            .inputs
            .iter()
            .map(|input| {
                format!(
                    "    row[{}] = random.uniform({:?}, {:?})",
                    py_str(&input.name),
                    input.lower_bound,
                    input.upper_bound
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let output_lines = record
            .outputs
            .iter()
            .enumerate()
            .map(|(index, output)| {
                format!(
                    "    row[{}] = {}",
                    py_str(output),
                    self.formula.expression(index + 1, &record.inputs)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        render_template(ARTIFACT_TEMPLATE, |token| match token {
            "study_name" => Ok(record.study_name.clone()),
            "executable" => Ok(py_str(&record.executable_path)),
            "result_table" => Ok(py_str(&self.run.result_table)),
            "headers" => Ok(headers.clone()),
            "iterations" => Ok(self.run.iterations.to_string()),
            "delay_seconds" => Ok(self.run.delay_seconds.to_string()),
            "sample_lines" => Ok(sample_lines.clone()),
            "output_lines" => Ok(output_lines.clone()),
            other => Err(GeneratorError::UnknownPlaceholder(other.to_string())),
        })
    }

    /// Writes the composed artifact, silently overwriting an existing file,
    /// and marks it executable so the launcher can spawn it directly.
    pub fn write_artifact(&self, record: &StudyRecord, path: &Path) -> Result<(), GeneratorError> {
        let text = self.compose(record)?;
        let write_err = |source: std::io::Error| GeneratorError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(path, text).map_err(write_err)?;
        make_executable(path).map_err(write_err)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
