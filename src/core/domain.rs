use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One judging target as handed over by the ingestion side.
///
/// Replaced wholesale when a new problem arrives; never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    pub contest_id: String,
    pub task_id: String,
    pub name: String,
    #[serde(default)]
    pub interactive: bool,
    /// Declared time limit in milliseconds.
    pub time_limit: u64,
    #[serde(default)]
    pub cases: Vec<TestCase>,
}

impl ProblemRecord {
    pub fn case(&self, index: u32) -> Option<&TestCase> {
        self.cases.iter().find(|case| case.index == index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// 1-based, ordering-significant.
    pub index: u32,
    pub input_path: PathBuf,
    /// May point at nothing; a missing expected fixture means empty output.
    pub output_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AC")]
    Accepted,
    #[serde(rename = "WA")]
    WrongAnswer,
    #[serde(rename = "TLE")]
    TimeLimitExceeded,
    #[serde(rename = "RE")]
    RuntimeError,
}

impl Verdict {
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::RuntimeError => "RE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of a single case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub index: u32,
    pub verdict: Verdict,
    pub duration_ms: u64,
    /// Line-ending normalised stdout.
    pub actual: String,
    /// Filtered diagnostic (stderr) text.
    pub console: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub wrong_answers: usize,
    pub timeouts: usize,
    pub runtime_errors: usize,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunScope {
    All,
    One,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Executable,
}

/// Build output shared by every case of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub id: Uuid,
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

impl Artifact {
    pub fn executable(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ArtifactKind::Executable,
            path,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Building,
    RunningCase(u32),
    Complete,
    Failed,
}
