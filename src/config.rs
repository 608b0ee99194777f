//! Run settings and where they come from.
//!
//! Settings are resolved once at the start of every run and treated as an
//! immutable snapshot for its whole duration.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        DEFAULT_CODON_COMMAND, DEFAULT_CODON_OUTPUT_NAME, DEFAULT_CPP_COMPILE_COMMAND,
        DEFAULT_CPP_RUN_COMMAND, DEFAULT_PYPY_COMMAND, DEFAULT_PYTHON_COMMAND,
        DEFAULT_TESTS_DIR, RUNTIME_ENV, TIMEOUT_ENV,
    },
    core::domain::ProblemRecord,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeVariant {
    /// Reference interpreter.
    #[default]
    Cpython,
    /// JIT interpreter.
    Pypy,
    /// Ahead-of-time compiled C++.
    Cpp,
    /// Python source compiled ahead of time by Codon.
    Codon,
}

impl std::str::FromStr for RuntimeVariant {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpython" | "python" => Ok(RuntimeVariant::Cpython),
            "pypy" => Ok(RuntimeVariant::Pypy),
            "cpp" | "c++" => Ok(RuntimeVariant::Cpp),
            "codon" => Ok(RuntimeVariant::Codon),
            other => Err(SettingsError::UnknownRuntime(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunCwdMode {
    /// Run from the project root.
    #[default]
    Workspace,
    /// Run from the problem's own directory.
    Task,
}

/// Only exact comparison exists; the legacy `mode` key is ignored on load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareSettings {
    #[serde(default = "default_true")]
    pub case_sensitive: bool,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunSettings {
    pub runtime: RuntimeVariant,
    pub python_command: String,
    pub pypy_command: String,
    pub cpp_compile_command: String,
    pub cpp_run_command: String,
    pub codon_command: String,
    pub codon_build_args: Vec<String>,
    pub codon_output_name: String,
    pub run_cwd_mode: RunCwdMode,
    pub timeout_ms: Option<u64>,
    pub compare: CompareSettings,
    pub contest_base_dir: String,
    pub tests_dir: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            runtime: RuntimeVariant::default(),
            python_command: DEFAULT_PYTHON_COMMAND.to_string(),
            pypy_command: DEFAULT_PYPY_COMMAND.to_string(),
            cpp_compile_command: DEFAULT_CPP_COMPILE_COMMAND.to_string(),
            cpp_run_command: DEFAULT_CPP_RUN_COMMAND.to_string(),
            codon_command: DEFAULT_CODON_COMMAND.to_string(),
            codon_build_args: vec![
                "build".to_string(),
                "-release".to_string(),
                "-exe".to_string(),
            ],
            codon_output_name: DEFAULT_CODON_OUTPUT_NAME.to_string(),
            run_cwd_mode: RunCwdMode::default(),
            timeout_ms: None,
            compare: CompareSettings::default(),
            contest_base_dir: ".".to_string(),
            tests_dir: DEFAULT_TESTS_DIR.to_string(),
        }
    }
}

impl RunSettings {
    /// Explicit override if set, else `ceil(time_limit * 1.2)`; never below 1 ms.
    pub fn case_timeout(&self, problem: &ProblemRecord) -> Duration {
        let ms = match self.timeout_ms {
            Some(ms) => ms,
            None => problem.time_limit.saturating_mul(6).div_ceil(5),
        };
        Duration::from_millis(ms.max(1))
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown runtime `{0}`")]
    UnknownRuntime(String),
    #[error("invalid value for {name}: `{value}`")]
    InvalidEnv { name: &'static str, value: String },
}

/// External collaborator that owns the settings; consulted at every run start.
pub trait SettingsSource: std::fmt::Debug + Send + Sync {
    fn load(&self) -> Result<RunSettings, SettingsError>;
}

/// A fixed snapshot.
#[derive(Clone, Debug, Default)]
pub struct StaticSettings(pub RunSettings);

impl SettingsSource for StaticSettings {
    fn load(&self) -> Result<RunSettings, SettingsError> {
        Ok(self.0.clone())
    }
}

/// JSON settings file re-read on every load, with environment overrides.
///
/// A missing file yields the defaults.
#[derive(Clone, Debug)]
pub struct FileSettings {
    path: Option<PathBuf>,
}

impl FileSettings {
    pub fn new<T: AsRef<Path>>(path: Option<T>) -> Self {
        Self {
            path: path.map(|p| p.as_ref().to_path_buf()),
        }
    }

    fn read_file(&self) -> Result<RunSettings, SettingsError> {
        let Some(path) = &self.path else {
            return Ok(RunSettings::default());
        };
        if !path.exists() {
            tracing::debug!("Settings file {} not found, using defaults", path.display());
            return Ok(RunSettings::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })
    }
}

impl SettingsSource for FileSettings {
    fn load(&self) -> Result<RunSettings, SettingsError> {
        let mut settings = self.read_file()?;
        apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        Ok(settings)
    }
}

fn apply_env_overrides(
    settings: &mut RunSettings,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    if let Some(runtime) = var(RUNTIME_ENV) {
        settings.runtime = runtime.parse()?;
    }
    if let Some(timeout) = var(TIMEOUT_ENV) {
        let ms = timeout
            .trim()
            .parse::<u64>()
            .map_err(|_| SettingsError::InvalidEnv {
                name: TIMEOUT_ENV,
                value: timeout.clone(),
            })?;
        settings.timeout_ms = Some(ms);
    }
    Ok(())
}
