use std::{path::Path, sync::Arc};

use crate::{
    config::RunSettings,
    constants::PYTHON_SOURCE_FILE,
    core::{
        domain::{Artifact, ProblemRecord, RunResult, TestCase},
        traits::{
            executor::{ProcessExecutor, ProcessRequest},
            runtime::RuntimeAdapter,
        },
    },
    error::RunError,
    runtime::{child_env, ensure_solution, judge, launch, read_case_io, resolve_cwd},
};

/// Interpreted and JIT runtimes: nothing to build, the interpreter is
/// started per case with the solution path as its only argument.
#[derive(Clone, Debug)]
pub struct ScriptAdapter {
    name: &'static str,
    command: fn(&RunSettings) -> &str,
    executor: Arc<dyn ProcessExecutor>,
}

fn python_command(settings: &RunSettings) -> &str {
    &settings.python_command
}

fn pypy_command(settings: &RunSettings) -> &str {
    &settings.pypy_command
}

impl ScriptAdapter {
    pub fn cpython(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            name: "CPython",
            command: python_command,
            executor,
        }
    }

    pub fn pypy(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            name: "PyPy",
            command: pypy_command,
            executor,
        }
    }
}

#[async_trait::async_trait]
impl RuntimeAdapter for ScriptAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn has_build_step(&self) -> bool {
        false
    }

    async fn maybe_build(
        &self,
        _problem: &ProblemRecord,
        _settings: &RunSettings,
        _root: &Path,
    ) -> Result<Option<Artifact>, RunError> {
        Ok(None)
    }

    async fn run_case(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
        case: &TestCase,
        _artifact: Option<Artifact>,
    ) -> Result<RunResult, RunError> {
        let solution = ensure_solution(root, settings, problem, PYTHON_SOURCE_FILE)?;
        let io = read_case_io(case).await?;

        let request = ProcessRequest {
            program: (self.command)(settings).to_string(),
            args: vec![solution.display().to_string()],
            cwd: resolve_cwd(root, settings, problem),
            env: child_env(root),
            stdin: io.input,
            timeout: Some(settings.case_timeout(problem)),
        };
        let output = launch(&self.executor, &request).await?;

        Ok(judge(
            case.index,
            &output,
            &io.expected,
            settings.compare.case_sensitive,
            true,
        ))
    }
}
