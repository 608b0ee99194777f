use std::{path::PathBuf, sync::Arc};

use tokio::time::Instant;
use uuid::Uuid;

use crate::{
    config::SettingsSource,
    core::{
        domain::{ProblemRecord, RunPhase, RunResult, RunScope, RunSummary, TestCase},
        summary::summarize,
        traits::{
            runtime::AdapterResolver,
            sink::{EventSink, NoticeLevel, RunEvent},
        },
    },
    error::RunError,
    state::SessionState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    All,
    One(u32),
}

impl Selection {
    fn scope(&self) -> RunScope {
        match self {
            Selection::All => RunScope::All,
            Selection::One(_) => RunScope::One,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub results: Vec<RunResult>,
    pub summary: RunSummary,
}

/// Drives a run: optional build, then each selected case in order, reporting
/// every step to the sink as it happens.
#[derive(Clone, Debug)]
pub struct Orchestrator {
    root: PathBuf,
    state: Arc<SessionState>,
    settings: Arc<dyn SettingsSource>,
    resolver: Arc<dyn AdapterResolver>,
    sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(
        root: PathBuf,
        state: Arc<SessionState>,
        settings: Arc<dyn SettingsSource>,
        resolver: Arc<dyn AdapterResolver>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            root,
            state,
            settings,
            resolver,
            sink,
        }
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    #[tracing::instrument(skip(self))]
    pub async fn run_all(&self) -> Result<RunOutcome, RunError> {
        self.run(Selection::All).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn run_one(&self, index: u32) -> Result<RunOutcome, RunError> {
        self.run(Selection::One(index)).await
    }

    async fn run(&self, selection: Selection) -> Result<RunOutcome, RunError> {
        let scope = selection.scope();

        let Some(problem) = self.state.problem() else {
            return Err(self.refuse(RunError::NoProblem));
        };
        let Some(_permit) = self.state.try_begin_run() else {
            return Err(self.refuse(RunError::AlreadyRunning));
        };
        if problem.interactive {
            return Err(self.refuse(RunError::InteractiveUnsupported));
        }
        if problem.cases.is_empty() {
            return Err(self.refuse(RunError::NoCases));
        }
        let cases: Vec<&TestCase> = match selection {
            Selection::All => problem.cases.iter().collect(),
            Selection::One(index) => match problem.case(index) {
                Some(case) => vec![case],
                None => return Err(self.refuse(RunError::CaseNotFound(index))),
            },
        };

        let run_id = Uuid::new_v4();
        tracing::info!(
            %run_id,
            problem = %problem.name,
            contest = %problem.contest_id,
            task = %problem.task_id,
            cases = cases.len(),
            "Starting run"
        );

        let current_index = match selection {
            Selection::All => None,
            Selection::One(index) => Some(index),
        };
        self.emit_progress(scope, true, current_index);

        let outcome = self.execute(scope, &problem, &cases).await;

        match &outcome {
            Ok(outcome) => {
                self.transition(RunPhase::Complete);
                tracing::info!(
                    %run_id,
                    passed = outcome.summary.passed,
                    total = outcome.summary.total,
                    "Run complete"
                );
            }
            Err(e) => {
                self.transition(RunPhase::Failed);
                tracing::error!(%run_id, "Run aborted: {}", e);
                self.sink.emit(RunEvent::Notice {
                    level: NoticeLevel::Error,
                    message: e.to_string(),
                });
            }
        }
        self.emit_progress(scope, false, None);

        outcome
    }

    async fn execute(
        &self,
        scope: RunScope,
        problem: &ProblemRecord,
        cases: &[&TestCase],
    ) -> Result<RunOutcome, RunError> {
        let settings = self.settings.load()?;
        let adapter = self.resolver.resolve(&settings);
        tracing::debug!(runtime = adapter.name(), "Resolved runtime");

        if adapter.has_build_step() {
            self.transition(RunPhase::Building);
        }
        let artifact = adapter.maybe_build(problem, &settings, &self.root).await?;

        // Build latency is not part of the reported run duration.
        let started = Instant::now();
        let mut results = Vec::with_capacity(cases.len());

        for case in cases {
            self.transition(RunPhase::RunningCase(case.index));
            if scope == RunScope::All {
                self.emit_progress(scope, true, Some(case.index));
            }

            let result = adapter
                .run_case(problem, &settings, &self.root, case, artifact.clone())
                .await?;
            tracing::info!(
                "#{} {} ({}ms)",
                result.index,
                result.verdict,
                result.duration_ms
            );

            self.sink.emit(RunEvent::Result {
                scope,
                result: result.clone(),
            });
            results.push(result);
        }

        let summary = summarize(&results, started.elapsed().as_millis() as u64);
        self.sink.emit(RunEvent::Complete {
            scope,
            summary: summary.clone(),
        });

        Ok(RunOutcome { results, summary })
    }

    fn refuse(&self, error: RunError) -> RunError {
        debug_assert!(error.is_refusal());
        tracing::warn!("Run refused: {}", error);
        self.sink.emit(RunEvent::Notice {
            level: NoticeLevel::Warn,
            message: error.to_string(),
        });
        error
    }

    fn transition(&self, phase: RunPhase) {
        tracing::debug!(?phase, "Run phase");
        self.state.set_phase(phase);
    }

    fn emit_progress(&self, scope: RunScope, running: bool, current_index: Option<u32>) {
        self.sink.emit(RunEvent::Progress {
            scope,
            running,
            current_index,
        });
    }
}
