use crate::shared::fs_atomic::write_atomic;
use crate::study::error::StudyError;
use crate::study::import::{parse_delimited_inputs, ImportReport};
use crate::study::record::{InputSpec, StudyName, StudyRecord, StudyStatus, UpsertOutcome};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// File-backed study store: one pretty-printed JSON record per sanitized
/// study name. Every mutation is a whole-record read-modify-write performed
/// under a lock keyed by the sanitized name, so concurrent tool calls against
/// the same study cannot lose updates.
#[derive(Debug)]
pub struct StudyStore {
    root: PathBuf,
    locks: Mutex<BTreeMap<String, Arc<Mutex<()>>>>,
}

fn unpoisoned<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|err| err.into_inner())
}

impl StudyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, name: &StudyName) -> PathBuf {
        self.root.join(format!("{}.json", name.file_stem()))
    }

    fn name_lock(&self, name: &StudyName) -> Arc<Mutex<()>> {
        let mut locks = unpoisoned(&self.locks);
        locks
            .entry(name.file_stem().to_string())
            .or_default()
            .clone()
    }

    fn load_if_exists(&self, name: &StudyName) -> Result<Option<StudyRecord>, StudyError> {
        let path = self.record_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StudyError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StudyError::Parse {
                path: path.display().to_string(),
                source,
            })
    }

    /// Read-only load; a missing record materializes as an unsaved skeleton.
    pub fn load(&self, name: &StudyName) -> Result<StudyRecord, StudyError> {
        Ok(self
            .load_if_exists(name)?
            .unwrap_or_else(|| StudyRecord::skeleton(name)))
    }

    fn persist(&self, name: &StudyName, record: &StudyRecord) -> Result<(), StudyError> {
        let path = self.record_path(name);
        let body = serde_json::to_vec_pretty(record).map_err(|source| StudyError::Serialize {
            name: name.raw().to_string(),
            source,
        })?;
        write_atomic(&path, &body).map_err(|source| StudyError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Idempotent: an existing record is returned untouched, a missing one is
    /// created as an empty skeleton and persisted immediately.
    pub fn create_or_load(&self, name: &StudyName) -> Result<StudyRecord, StudyError> {
        let guard = self.name_lock(name);
        let _held = unpoisoned(&guard);
        let record = self.load(name)?;
        self.persist(name, &record)?;
        Ok(record)
    }

    /// Unconditional overwrite; the target is not checked for existence.
    pub fn set_executable_path(
        &self,
        name: &StudyName,
        path: &str,
    ) -> Result<StudyRecord, StudyError> {
        let guard = self.name_lock(name);
        let _held = unpoisoned(&guard);
        let mut record = self.load(name)?;
        record.executable_path = path.to_string();
        self.persist(name, &record)?;
        Ok(record)
    }

    pub fn upsert_input(
        &self,
        name: &StudyName,
        input: InputSpec,
    ) -> Result<UpsertOutcome, StudyError> {
        let guard = self.name_lock(name);
        let _held = unpoisoned(&guard);
        let mut record = self.load(name)?;
        let outcome = record.upsert_input(input);
        self.persist(name, &record)?;
        Ok(outcome)
    }

    /// Non-transactional by contract: rows parsed before the first bad row
    /// are applied and persisted, then the bad row is reported as an error.
    pub fn import_inputs(
        &self,
        name: &StudyName,
        source: &Path,
    ) -> Result<ImportReport, StudyError> {
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
        let parsed = parse_delimited_inputs(source, &text)?;

        let guard = self.name_lock(name);
        let _held = unpoisoned(&guard);
        let mut record = self.load(name)?;
        for row in &parsed.rows {
            record.upsert_input(row.clone());
        }
        self.persist(name, &record)?;

        if let Some(failure) = parsed.failure {
            return Err(StudyError::RowParse {
                path: source.display().to_string(),
                line: failure.line,
                row: failure.row,
                imported: parsed.rows.len(),
            });
        }
        Ok(ImportReport {
            imported: parsed.rows.len(),
        })
    }

    /// Adds `selected` to the output set, deduplicating while preserving
    /// first-seen order; returns the resulting set.
    pub fn union_outputs(
        &self,
        name: &StudyName,
        selected: &[String],
    ) -> Result<Vec<String>, StudyError> {
        let guard = self.name_lock(name);
        let _held = unpoisoned(&guard);
        let mut record = self.load(name)?;
        record.union_outputs(selected);
        self.persist(name, &record)?;
        Ok(record.outputs)
    }

    /// Read-only status; does not create or touch the record.
    pub fn status(&self, name: &StudyName) -> Result<StudyStatus, StudyError> {
        Ok(self.load(name)?.status())
    }
}
