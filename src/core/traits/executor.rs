use std::{collections::BTreeMap, path::PathBuf, time::Duration};

/// Everything needed to launch one child process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Complete environment of the child; nothing is inherited implicitly.
    pub env: BTreeMap<String, String>,
    pub stdin: Vec<u8>,
    /// `None` waits indefinitely (used for builds).
    pub timeout: Option<Duration>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// `code` is `None` when the process was ended by a signal.
    Exited { code: Option<i32> },
    TimedOut,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutput {
    pub termination: Termination,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration_ms: u64,
}

impl ProcessOutput {
    pub fn timed_out(&self) -> bool {
        self.termination == Termination::TimedOut
    }

    pub fn success(&self) -> bool {
        self.termination == Termination::Exited { code: Some(0) }
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error while talking to child process: {0}")]
    Io(#[from] std::io::Error),
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessExecutor: std::fmt::Debug + Send + Sync {
    async fn execute(&self, request: &ProcessRequest) -> Result<ProcessOutput, ExecError>;
}
