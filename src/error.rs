use std::path::PathBuf;

use crate::config::SettingsError;

/// Conditions that abort a run or keep it from starting.
///
/// Per-case outcomes (AC/WA/TLE/RE) are verdicts, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("No problem loaded.")]
    NoProblem,
    #[error("Already running tests.")]
    AlreadyRunning,
    #[error("Interactive problems are not supported yet.")]
    InteractiveUnsupported,
    #[error("No test cases available to run.")]
    NoCases,
    #[error("Test case #{0} not found.")]
    CaseNotFound(u32),
    #[error("Solution file not found at {}", .0.display())]
    MissingSolutionFile(PathBuf),
    #[error("{runtime} build failed.\n{diagnostics}")]
    BuildFailure {
        runtime: &'static str,
        diagnostics: String,
    },
    #[error("{runtime} binary not found at {}", path.display())]
    MissingArtifact { runtime: &'static str, path: PathBuf },
    #[error("Failed to launch `{program}`: {message}")]
    LaunchFailure { program: String, message: String },
    #[error("Failed to read test fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl RunError {
    /// Refusals raised before a run is admitted, as opposed to aborts.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            RunError::NoProblem
                | RunError::AlreadyRunning
                | RunError::InteractiveUnsupported
                | RunError::NoCases
                | RunError::CaseNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refusals_are_raised_before_admission() {
        assert!(RunError::NoProblem.is_refusal());
        assert!(RunError::CaseNotFound(99).is_refusal());
        assert_eq!(
            RunError::CaseNotFound(99).to_string(),
            "Test case #99 not found."
        );

        let build = RunError::BuildFailure {
            runtime: "C++",
            diagnostics: "main.cpp:1:1: error".to_string(),
        };
        assert!(!build.is_refusal());
        assert!(!RunError::MissingSolutionFile(PathBuf::from("main.py")).is_refusal());
    }
}
