//! Runtime variants and the helpers they share.

pub mod compiled;
pub mod script;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::{RunCwdMode, RunSettings, RuntimeVariant},
    constants::{PYPY_CACHE_WARNING, WORKSPACE_DIR_ENV},
    core::{
        compare::{compare, normalize_line_endings},
        domain::{ProblemRecord, RunResult, TestCase, Verdict},
        traits::{
            executor::{ExecError, ProcessExecutor, ProcessOutput, ProcessRequest},
            runtime::{AdapterResolver, RuntimeAdapter},
        },
    },
    error::RunError,
    paths,
};

pub use compiled::{BuildOnceAdapter, Toolchain};
pub use script::ScriptAdapter;

/// Maps the configured runtime to its adapter.
#[derive(Clone, Debug)]
pub struct RuntimeRegistry {
    executor: Arc<dyn ProcessExecutor>,
}

impl RuntimeRegistry {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self { executor }
    }
}

impl AdapterResolver for RuntimeRegistry {
    fn resolve(&self, settings: &RunSettings) -> Arc<dyn RuntimeAdapter> {
        let executor = self.executor.clone();
        match settings.runtime {
            RuntimeVariant::Cpython => Arc::new(ScriptAdapter::cpython(executor)),
            RuntimeVariant::Pypy => Arc::new(ScriptAdapter::pypy(executor)),
            RuntimeVariant::Cpp => Arc::new(BuildOnceAdapter::new(Toolchain::Cpp, executor)),
            RuntimeVariant::Codon => Arc::new(BuildOnceAdapter::new(Toolchain::Codon, executor)),
        }
    }
}

pub(crate) fn task_dir(root: &Path, settings: &RunSettings, problem: &ProblemRecord) -> PathBuf {
    paths::resolve_task_dir(
        root,
        &settings.contest_base_dir,
        &problem.contest_id,
        &problem.task_id,
    )
}

pub(crate) fn ensure_solution(
    root: &Path,
    settings: &RunSettings,
    problem: &ProblemRecord,
    file_name: &str,
) -> Result<PathBuf, RunError> {
    let solution = task_dir(root, settings, problem).join(file_name);
    if !solution.is_file() {
        return Err(RunError::MissingSolutionFile(solution));
    }
    Ok(solution)
}

pub(crate) fn resolve_cwd(root: &Path, settings: &RunSettings, problem: &ProblemRecord) -> PathBuf {
    match settings.run_cwd_mode {
        RunCwdMode::Workspace => root.to_path_buf(),
        RunCwdMode::Task => task_dir(root, settings, problem),
    }
}

/// Inherited environment plus the root directory for helper scripts.
pub(crate) fn child_env(root: &Path) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = std::env::vars().collect();
    env.insert(WORKSPACE_DIR_ENV.to_string(), root.display().to_string());
    env
}

pub(crate) struct CaseIo {
    pub input: Vec<u8>,
    pub expected: String,
}

pub(crate) async fn read_case_io(case: &TestCase) -> Result<CaseIo, RunError> {
    let input = tokio::fs::read(&case.input_path)
        .await
        .map_err(|source| RunError::Fixture {
            path: case.input_path.clone(),
            source,
        })?;

    let expected = if case.output_path.is_file() {
        let bytes = tokio::fs::read(&case.output_path)
            .await
            .map_err(|source| RunError::Fixture {
                path: case.output_path.clone(),
                source,
            })?;
        String::from_utf8_lossy(&bytes).to_string()
    } else {
        String::new()
    };

    Ok(CaseIo { input, expected })
}

pub(crate) async fn launch(
    executor: &Arc<dyn ProcessExecutor>,
    request: &ProcessRequest,
) -> Result<ProcessOutput, RunError> {
    executor.execute(request).await.map_err(|e| match e {
        ExecError::Launch { program, source } => RunError::LaunchFailure {
            program,
            message: source.to_string(),
        },
        ExecError::Io(source) => RunError::LaunchFailure {
            program: request.program.clone(),
            message: source.to_string(),
        },
    })
}

/// Drops the PyPy cache-size warning lines and trims the rest.
pub fn filter_console(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.contains(PYPY_CACHE_WARNING))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Verdict rules shared by all runtimes: timeout beats exit status, exit
/// status beats output.
pub fn judge(
    index: u32,
    output: &ProcessOutput,
    expected: &str,
    case_sensitive: bool,
    filter_warnings: bool,
) -> RunResult {
    let actual = normalize_line_endings(&output.stdout_lossy());
    let console = normalize_line_endings(&output.stderr_lossy());
    let console = if filter_warnings {
        filter_console(&console)
    } else {
        console.trim().to_string()
    };

    let verdict = if output.timed_out() {
        Verdict::TimeLimitExceeded
    } else if !output.success() {
        Verdict::RuntimeError
    } else if compare(expected, &actual, case_sensitive) {
        Verdict::Accepted
    } else {
        Verdict::WrongAnswer
    };

    RunResult {
        index,
        verdict,
        duration_ms: output.duration_ms,
        actual,
        console,
    }
}
