use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid yaml in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("settings validation failed: {0}")]
    Settings(String),
    #[error("failed to resolve home directory for the state root")]
    HomeDirectoryUnavailable,
}

pub const STATE_DIR: &str = ".studyforge";
pub const SETTINGS_FILE_NAME: &str = "config.yaml";

fn default_iterations() -> u32 {
    20
}

fn default_delay_seconds() -> u64 {
    1
}

fn default_result_table() -> String {
    "output.csv".to_string()
}

/// Run-shape knobs compiled into generated artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: u64,
    /// File name of the result table; the artifact writes it to its own
    /// working directory.
    #[serde(default = "default_result_table")]
    pub result_table: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            delay_seconds: default_delay_seconds(),
            result_table: default_result_table(),
        }
    }
}

fn default_visualizer_command() -> Vec<String> {
    ["streamlit", "run", "dashboard.py"]
        .map(str::to_string)
        .to_vec()
}

/// Command used for the fire-and-forget visualizer spawn. `{table}` tokens
/// are replaced with the result-table path; when none is present the path is
/// appended as the final argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerSettings {
    #[serde(default = "default_visualizer_command")]
    pub command: Vec<String>,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            command: default_visualizer_command(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Root for study records, logs and run state.
    pub state_root: PathBuf,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub visualizer: VisualizerSettings,
}

impl Settings {
    pub fn with_state_root(state_root: impl Into<PathBuf>) -> Self {
        Self {
            state_root: state_root.into(),
            run: RunSettings::default(),
            visualizer: VisualizerSettings::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.state_root.is_absolute() {
            return Err(ConfigError::Settings(
                "`state_root` must be an absolute path".to_string(),
            ));
        }
        if self.run.iterations == 0 {
            return Err(ConfigError::Settings(
                "`run.iterations` must be at least 1".to_string(),
            ));
        }
        if self.run.result_table.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`run.result_table` must be non-empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn studies_dir(&self) -> PathBuf {
        self.state_root.join("studies")
    }

    /// Conventional result-table location: artifacts built under the state
    /// root write their table here, and the visualizer points at it.
    pub fn result_table_path(&self) -> PathBuf {
        self.state_root.join(&self.run.result_table)
    }
}

pub fn default_state_root() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(STATE_DIR))
}

pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    Ok(default_state_root()?.join(SETTINGS_FILE_NAME))
}

/// Global settings: the YAML file under the state root when present,
/// defaults otherwise.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = default_settings_path()?;
    if !path.exists() {
        return Ok(Settings::with_state_root(default_state_root()?));
    }
    let settings = Settings::from_path(&path)?;
    settings.validate()?;
    Ok(settings)
}
