use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableProgress {
    /// The artifact has not created the result table yet.
    NotStarted,
    /// Count of complete data rows, header excluded.
    Rows(usize),
}

impl TableProgress {
    pub fn rows(&self) -> usize {
        match self {
            TableProgress::NotStarted => 0,
            TableProgress::Rows(count) => *count,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("failed to read result table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Counts complete rows in a result table that may be appended to
/// concurrently. Only newline-terminated lines count, so a row that is
/// mid-append is excluded from the total instead of failing the poll.
pub fn table_progress(path: &Path) -> Result<TableProgress, ProgressError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(TableProgress::NotStarted),
        Err(source) => {
            return Err(ProgressError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let complete_lines = bytes.iter().filter(|byte| **byte == b'\n').count();
    Ok(TableProgress::Rows(complete_lines.saturating_sub(1)))
}
