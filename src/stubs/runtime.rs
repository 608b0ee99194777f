use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    config::RunSettings,
    core::{
        domain::{Artifact, ProblemRecord, RunResult, TestCase, Verdict},
        traits::runtime::RuntimeAdapter,
    },
    error::RunError,
};

/// Adapter that sleeps instead of launching anything and answers every case
/// with the same verdict.
#[derive(Debug, Clone)]
pub struct RuntimeStub {
    build_delay: Duration,
    case_delay: Duration,
    verdict: Verdict,
    builds: Arc<AtomicUsize>,
    runs: Arc<AtomicUsize>,
}

impl RuntimeStub {
    pub fn new(build_delay: Duration, case_delay: Duration, verdict: Verdict) -> Self {
        Self {
            build_delay,
            case_delay,
            verdict,
            builds: Arc::new(AtomicUsize::new(0)),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn builds(&self) -> Arc<AtomicUsize> {
        self.builds.clone()
    }

    pub fn runs(&self) -> Arc<AtomicUsize> {
        self.runs.clone()
    }
}

#[async_trait::async_trait]
impl RuntimeAdapter for RuntimeStub {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn has_build_step(&self) -> bool {
        true
    }

    #[tracing::instrument(skip_all)]
    async fn maybe_build(
        &self,
        _problem: &ProblemRecord,
        _settings: &RunSettings,
        root: &Path,
    ) -> Result<Option<Artifact>, RunError> {
        tracing::debug!("Start build: delay={:?}", self.build_delay);
        tokio::time::sleep(self.build_delay).await;
        self.builds.fetch_add(1, Ordering::SeqCst);

        Ok(Some(Artifact::executable(root.join("stub.out"))))
    }

    #[tracing::instrument(skip_all)]
    async fn run_case(
        &self,
        _problem: &ProblemRecord,
        _settings: &RunSettings,
        _root: &Path,
        case: &TestCase,
        _artifact: Option<Artifact>,
    ) -> Result<RunResult, RunError> {
        tracing::debug!("Start case #{}: delay={:?}", case.index, self.case_delay);
        tokio::time::sleep(self.case_delay).await;
        self.runs.fetch_add(1, Ordering::SeqCst);

        Ok(RunResult {
            index: case.index,
            verdict: self.verdict,
            duration_ms: self.case_delay.as_millis() as u64,
            actual: String::new(),
            console: String::new(),
        })
    }
}
