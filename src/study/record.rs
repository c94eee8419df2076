use crate::study::error::StudyError;
use serde::{Deserialize, Serialize};

/// Identifier of a study. The sanitized form doubles as the persistence key:
/// ASCII alphanumerics, spaces, `-` and `_` survive, everything else is
/// dropped, and the result is trimmed. The raw form is what callers typed and
/// is stored inside the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyName {
    raw: String,
    sanitized: String,
}

impl StudyName {
    pub fn parse(raw: &str) -> Result<Self, StudyError> {
        let sanitized: String = raw
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '-' | '_'))
            .collect();
        let sanitized = sanitized.trim().to_string();
        if sanitized.is_empty() {
            return Err(StudyError::EmptyName(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            sanitized,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// File stem of the record on disk (`<stem>.json`).
    pub fn file_stem(&self) -> &str {
        &self.sanitized
    }
}

impl std::fmt::Display for StudyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.raw.fmt(f)
    }
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    /// Bounds are stored exactly as supplied; `lower_bound <= upper_bound` is
    /// not validated anywhere.
    pub lower_bound: f64,
    pub upper_bound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub study_name: String,
    pub executable_path: String,
    #[serde(default)]
    pub inputs: Vec<InputSpec>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyStatus {
    pub study_name: String,
    pub executable_path: String,
    pub input_count: usize,
    pub output_count: usize,
    pub outputs: Vec<String>,
}

impl StudyStatus {
    pub fn executable_set(&self) -> bool {
        !self.executable_path.is_empty()
    }

    /// The validity invariant: executable path set, at least one input, at
    /// least one output.
    pub fn is_valid(&self) -> bool {
        self.executable_set() && self.input_count > 0 && self.output_count > 0
    }
}

impl StudyRecord {
    pub fn skeleton(name: &StudyName) -> Self {
        Self {
            schema_version: default_schema_version(),
            study_name: name.raw().to_string(),
            executable_path: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Replaces the bounds of an existing input of the same name in place
    /// (its position is kept), otherwise appends.
    pub fn upsert_input(&mut self, input: InputSpec) -> UpsertOutcome {
        if let Some(existing) = self.inputs.iter_mut().find(|i| i.name == input.name) {
            existing.lower_bound = input.lower_bound;
            existing.upper_bound = input.upper_bound;
            UpsertOutcome::Updated
        } else {
            self.inputs.push(input);
            UpsertOutcome::Inserted
        }
    }

    /// Order-preserving union: the first occurrence of a name wins its slot,
    /// later duplicates are dropped. Keeps the result-table header stable
    /// across repeated selections.
    pub fn union_outputs(&mut self, selected: &[String]) {
        for name in selected {
            if !self.outputs.iter().any(|existing| existing == name) {
                self.outputs.push(name.clone());
            }
        }
    }

    pub fn status(&self) -> StudyStatus {
        StudyStatus {
            study_name: self.study_name.clone(),
            executable_path: self.executable_path.clone(),
            input_count: self.inputs.len(),
            output_count: self.outputs.len(),
            outputs: self.outputs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitization_keeps_alnum_space_dash_underscore() {
        let name = StudyName::parse("wing/load: v2").expect("parse");
        assert_eq!(name.raw(), "wing/load: v2");
        assert_eq!(name.file_stem(), "wingload v2");
    }

    #[test]
    fn fully_sanitized_away_names_are_rejected() {
        assert!(StudyName::parse("///").is_err());
        assert!(StudyName::parse("   ").is_err());
    }
}
