use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::RunSettings,
    constants::{CPP_ARTIFACT_FILE, CPP_SOURCE_FILE, DEFAULT_CPP_RUN_COMMAND, PYTHON_SOURCE_FILE},
    core::{
        compare::normalize_line_endings,
        domain::{Artifact, ProblemRecord, RunResult, TestCase},
        traits::{
            executor::{ProcessExecutor, ProcessRequest},
            runtime::RuntimeAdapter,
        },
    },
    error::RunError,
    paths::relative_to,
    runtime::{child_env, ensure_solution, judge, launch, read_case_io, resolve_cwd, task_dir},
};

/// Command conventions of a build-once runtime. The lifecycle is identical
/// for every toolchain; only how the build and the run are spelled differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toolchain {
    /// `cpp_compile <contest> <task>` from the root, then
    /// `cpp_run <contest> <task> <relative input>` from the task dir.
    Cpp,
    /// `codon <build args> -o <artifact> main.py`, then the artifact itself.
    Codon,
}

impl Toolchain {
    fn display_name(&self) -> &'static str {
        match self {
            Toolchain::Cpp => "C++",
            Toolchain::Codon => "Codon",
        }
    }

    fn source_file(&self) -> &'static str {
        match self {
            Toolchain::Cpp => CPP_SOURCE_FILE,
            Toolchain::Codon => PYTHON_SOURCE_FILE,
        }
    }

    fn artifact_path(&self, task_dir: &Path, settings: &RunSettings) -> PathBuf {
        match self {
            Toolchain::Cpp => task_dir.join(CPP_ARTIFACT_FILE),
            Toolchain::Codon => task_dir.join(&settings.codon_output_name),
        }
    }

    fn build_request(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
        solution: &Path,
        artifact: &Path,
    ) -> ProcessRequest {
        let (program, args, cwd) = match self {
            Toolchain::Cpp => (
                settings.cpp_compile_command.clone(),
                vec![problem.contest_id.clone(), problem.task_id.clone()],
                root.to_path_buf(),
            ),
            Toolchain::Codon => {
                let mut args = settings.codon_build_args.clone();
                args.push("-o".to_string());
                args.push(artifact.display().to_string());
                args.push(solution.display().to_string());
                (
                    settings.codon_command.clone(),
                    args,
                    task_dir(root, settings, problem),
                )
            }
        };

        ProcessRequest {
            program,
            args,
            cwd,
            env: child_env(root),
            stdin: Vec::new(),
            timeout: None,
        }
    }

    fn run_request(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
        case: &TestCase,
        artifact: &Path,
        input: Vec<u8>,
    ) -> ProcessRequest {
        let (program, args, cwd) = match self {
            Toolchain::Cpp => {
                let task_dir = task_dir(root, settings, problem);
                let relative_input = relative_to(&case.input_path, &task_dir);
                let program = if settings.cpp_run_command.trim().is_empty() {
                    DEFAULT_CPP_RUN_COMMAND.to_string()
                } else {
                    settings.cpp_run_command.clone()
                };
                (
                    program,
                    vec![
                        problem.contest_id.clone(),
                        problem.task_id.clone(),
                        relative_input.display().to_string(),
                    ],
                    task_dir,
                )
            }
            Toolchain::Codon => (
                artifact.display().to_string(),
                Vec::new(),
                resolve_cwd(root, settings, problem),
            ),
        };

        ProcessRequest {
            program,
            args,
            cwd,
            env: child_env(root),
            stdin: input,
            timeout: Some(settings.case_timeout(problem)),
        }
    }
}

/// Ahead-of-time runtimes: build once per run, reuse the artifact per case.
#[derive(Clone, Debug)]
pub struct BuildOnceAdapter {
    toolchain: Toolchain,
    executor: Arc<dyn ProcessExecutor>,
}

impl BuildOnceAdapter {
    pub fn new(toolchain: Toolchain, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            toolchain,
            executor,
        }
    }

    fn missing_artifact(&self, path: PathBuf) -> RunError {
        RunError::MissingArtifact {
            runtime: self.toolchain.display_name(),
            path,
        }
    }
}

#[async_trait::async_trait]
impl RuntimeAdapter for BuildOnceAdapter {
    fn name(&self) -> &'static str {
        self.toolchain.display_name()
    }

    fn has_build_step(&self) -> bool {
        true
    }

    #[tracing::instrument(skip_all)]
    async fn maybe_build(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
    ) -> Result<Option<Artifact>, RunError> {
        let solution = ensure_solution(root, settings, problem, self.toolchain.source_file())?;
        let artifact_path = self
            .toolchain
            .artifact_path(&task_dir(root, settings, problem), settings);

        let request =
            self.toolchain
                .build_request(problem, settings, root, &solution, &artifact_path);
        tracing::debug!("Start building: {:?} {:?}", request.program, request.args);
        let output = launch(&self.executor, &request).await?;

        if !output.success() {
            let stderr = normalize_line_endings(&output.stderr_lossy());
            let diagnostics = if stderr.trim().is_empty() {
                normalize_line_endings(&output.stdout_lossy())
            } else {
                stderr
            };
            return Err(RunError::BuildFailure {
                runtime: self.toolchain.display_name(),
                diagnostics: diagnostics.trim().to_string(),
            });
        }

        if !artifact_path.is_file() {
            return Err(self.missing_artifact(artifact_path));
        }

        tracing::debug!("Build succeeded: {}", artifact_path.display());
        Ok(Some(Artifact::executable(artifact_path)))
    }

    async fn run_case(
        &self,
        problem: &ProblemRecord,
        settings: &RunSettings,
        root: &Path,
        case: &TestCase,
        artifact: Option<Artifact>,
    ) -> Result<RunResult, RunError> {
        let artifact_path = match artifact {
            Some(artifact) => artifact.path,
            None => self
                .toolchain
                .artifact_path(&task_dir(root, settings, problem), settings),
        };
        if !artifact_path.is_file() {
            return Err(self.missing_artifact(artifact_path));
        }

        let io = read_case_io(case).await?;
        let request =
            self.toolchain
                .run_request(problem, settings, root, case, &artifact_path, io.input);
        let output = launch(&self.executor, &request).await?;

        Ok(judge(
            case.index,
            &output,
            &io.expected,
            settings.compare.case_sensitive,
            false,
        ))
    }
}
