use std::{path::Path, sync::Arc};

use crate::{
    config::RunSettings,
    core::domain::{Artifact, ProblemRecord, RunResult, TestCase},
    error::RunError,
};

/// Per-runtime strategy: an optional build once per run, then one call per case.
#[mockall::automock]
#[async_trait::async_trait]
pub trait RuntimeAdapter: std::fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `maybe_build` does real work; no-build runtimes skip the
    /// `Building` phase.
    fn has_build_step(&self) -> bool;

    async fn maybe_build(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
    ) -> Result<Option<Artifact>, RunError>;

    async fn run_case(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
        case: &TestCase,
        artifact: Option<Artifact>,
    ) -> Result<RunResult, RunError>;
}

/// Picks the adapter for a resolved settings snapshot.
#[mockall::automock]
pub trait AdapterResolver: std::fmt::Debug + Send + Sync {
    fn resolve(&self, settings: &RunSettings) -> Arc<dyn RuntimeAdapter>;
}
