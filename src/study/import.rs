use crate::study::error::StudyError;
use crate::study::record::InputSpec;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Rows parsed from a delimited input source, up to the first row whose
/// bounds failed to parse. Pure parse result; the store decides what to
/// persist.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedImport {
    pub rows: Vec<InputSpec>,
    pub failure: Option<RowFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based line number in the source file.
    pub line: usize,
    pub row: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
}

const REQUIRED_HEADERS: [&str; 3] = ["name", "lower_bound", "upper_bound"];

fn normalize_header(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Parses comma-delimited input definitions. The header row must contain
/// `name`, `lower_bound` and `upper_bound` (case- and whitespace-normalized,
/// any column order, extra columns ignored). Data rows are consumed in order
/// until the first row whose bounds are not numbers; that row is reported via
/// `failure` and parsing stops there.
pub fn parse_delimited_inputs(source: &Path, text: &str) -> Result<DelimitedImport, StudyError> {
    let mut lines = text.lines().enumerate();
    let header_line = lines
        .by_ref()
        .find(|(_, line)| !line.trim().is_empty())
        .map(|(_, line)| line)
        .unwrap_or_default();
    let headers: Vec<String> = header_line.split(',').map(normalize_header).collect();

    let mut columns = [0usize; 3];
    for (slot, required) in columns.iter_mut().zip(REQUIRED_HEADERS) {
        match headers.iter().position(|h| h.as_str() == required) {
            Some(index) => *slot = index,
            None => {
                return Err(StudyError::MissingHeaders {
                    path: source.display().to_string(),
                    found: headers.join(", "),
                })
            }
        }
    }
    let [name_col, lower_col, upper_col] = columns;

    let mut rows = Vec::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let name = fields.get(name_col).map(|f| f.trim()).unwrap_or_default();
        let lower = fields
            .get(lower_col)
            .and_then(|f| f.trim().parse::<f64>().ok());
        let upper = fields
            .get(upper_col)
            .and_then(|f| f.trim().parse::<f64>().ok());

        match (lower, upper) {
            (Some(lower_bound), Some(upper_bound)) => {
                rows.push(InputSpec {
                    name: name.to_string(),
                    lower_bound,
                    upper_bound,
                });
            }
            _ => {
                return Ok(DelimitedImport {
                    rows,
                    failure: Some(RowFailure {
                        line: index + 1,
                        row: line.trim().to_string(),
                    }),
                })
            }
        }
    }

    Ok(DelimitedImport {
        rows,
        failure: None,
    })
}

/// Reads a line-oriented file of candidate output names: each line trimmed,
/// blank lines dropped, order kept. No persistence happens here; committing a
/// subset is a separate union operation.
pub fn list_candidate_outputs(source: &Path) -> Result<Vec<String>, StudyError> {
    let text = match fs::read_to_string(source) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(StudyError::NotFound {
                path: source.display().to_string(),
            })
        }
        Err(err) => {
            return Err(StudyError::Read {
                path: source.display().to_string(),
                source: err,
            })
        }
    };

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
