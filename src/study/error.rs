#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("study name `{0}` is empty after sanitization")]
    EmptyName(String),
    #[error("file not found at {path}")]
    NotFound { path: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in study record {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize study `{name}`: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "{path} is missing required headers; found [{found}], required `name`, `lower_bound`, `upper_bound`"
    )]
    MissingHeaders { path: String, found: String },
    #[error(
        "row {line} of {path} could not be parsed (`{row}`); bounds must be numbers. {imported} row(s) imported before it were kept"
    )]
    RowParse {
        path: String,
        line: usize,
        row: String,
        imported: usize,
    },
}
