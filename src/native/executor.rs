use std::process::Stdio;

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::{ChildStdin, Command},
    task::JoinHandle,
    time::{Duration, Instant, timeout},
};

use crate::{
    constants::PIPE_DRAIN_GRACE_MS,
    core::traits::executor::{ExecError, ProcessExecutor, ProcessOutput, ProcessRequest, Termination},
};

/// Launches processes directly on the host with `tokio::process`.
#[derive(Clone, Debug, Default)]
pub struct NativeExecutor;

impl NativeExecutor {
    pub fn new() -> Self {
        NativeExecutor
    }
}

fn collect<R>(pipe: Option<R>) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    })
}

fn feed(stdin: Option<ChildStdin>, input: Vec<u8>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(mut stdin) = stdin {
            // The child may exit without reading everything; a broken
            // pipe here is not an error of the run.
            if let Err(e) = stdin.write_all(&input).await {
                tracing::debug!("stdin write stopped early: {}", e);
            }
            // Dropping the handle closes the pipe and signals EOF.
            drop(stdin);
        }
    })
}

async fn join_reader(handle: &mut JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>, ExecError> {
    handle
        .await
        .map_err(|e| ExecError::Io(std::io::Error::other(e)))?
        .map_err(ExecError::Io)
}

/// Joins a reader after a kill. Descendants of the child may still hold the
/// pipe open, so the wait is bounded and an unfinished read is dropped.
async fn drain_reader(mut handle: JoinHandle<std::io::Result<Vec<u8>>>) -> Vec<u8> {
    match timeout(Duration::from_millis(PIPE_DRAIN_GRACE_MS), &mut handle).await {
        Ok(Ok(Ok(buf))) => buf,
        Ok(_) => Vec::new(),
        Err(_) => {
            handle.abort();
            Vec::new()
        }
    }
}

/// Elapsed time rounded up to whole milliseconds.
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_micros().div_ceil(1000) as u64
}

#[async_trait::async_trait]
impl ProcessExecutor for NativeExecutor {
    #[tracing::instrument(skip(self, request), fields(program = %request.program))]
    async fn execute(&self, request: &ProcessRequest) -> Result<ProcessOutput, ExecError> {
        tracing::debug!(
            args = ?request.args,
            cwd = %request.cwd.display(),
            timeout = ?request.timeout,
            "Launching process"
        );

        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .current_dir(&request.cwd)
            .env_clear()
            .envs(&request.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| ExecError::Launch {
            program: request.program.clone(),
            source,
        })?;

        let mut stdout = collect(child.stdout.take());
        let mut stderr = collect(child.stderr.take());
        let mut writer = feed(child.stdin.take(), request.stdin.clone());

        // The deadline also bounds the stdin feed and the pipes reaching EOF.
        let finished = async {
            let status = child.wait().await?;
            let _ = (&mut writer).await;
            let (out, err) =
                futures::try_join!(join_reader(&mut stdout), join_reader(&mut stderr))?;
            Ok::<_, ExecError>((status, out, err))
        };
        let finished = match request.timeout {
            Some(limit) => timeout(limit, finished).await.ok(),
            None => Some(finished.await),
        };

        let (termination, stdout, stderr) = match finished {
            Some(result) => {
                let (status, stdout, stderr) = result?;
                (Termination::Exited { code: status.code() }, stdout, stderr)
            }
            None => {
                tracing::debug!("Deadline of {:?} reached, killing process", request.timeout);
                // The child itself may already be reaped while a descendant
                // holds the pipes; that kill failure is expected.
                if let Err(e) = child.kill().await {
                    tracing::debug!("kill after deadline: {}", e);
                }
                writer.abort();
                (
                    Termination::TimedOut,
                    drain_reader(stdout).await,
                    drain_reader(stderr).await,
                )
            }
        };
        let duration_ms = elapsed_ms(start);

        tracing::debug!(?termination, duration_ms, "Process finished");

        Ok(ProcessOutput {
            termination,
            stdout,
            stderr,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use super::*;

    fn base_env() -> BTreeMap<String, String> {
        std::env::vars().collect()
    }

    fn sh(script: &str, stdin: &str, timeout: Option<Duration>) -> ProcessRequest {
        ProcessRequest {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            cwd: std::env::temp_dir(),
            env: base_env(),
            stdin: stdin.as_bytes().to_vec(),
            timeout,
        }
    }

    #[tokio::test]
    async fn test_echo_stdin() {
        let output = NativeExecutor::new()
            .execute(&sh("cat", "hello\n", Some(Duration::from_secs(5))))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, b"hello\n");
        assert!(output.stderr.is_empty());
        assert!(output.duration_ms > 0);
    }

    #[tokio::test]
    async fn test_stderr_and_exit_code() {
        let output = NativeExecutor::new()
            .execute(&sh("echo oops >&2; exit 3", "", None))
            .await
            .unwrap();

        assert_eq!(output.termination, Termination::Exited { code: Some(3) });
        assert_eq!(output.stderr_lossy(), "oops\n");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let request = ProcessRequest {
            program: "sleep".to_string(),
            args: vec!["5".to_string()],
            cwd: std::env::temp_dir(),
            env: base_env(),
            stdin: Vec::new(),
            timeout: Some(Duration::from_millis(100)),
        };

        let started = std::time::Instant::now();
        let output = NativeExecutor::new().execute(&request).await.unwrap();

        assert!(output.timed_out());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_deadline_covers_unread_stdin() {
        // The shell is killed, but its `sleep` child keeps the stdin pipe open.
        let input = "z".repeat(1024 * 1024);
        let request = sh("sleep 3; true", &input, Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let output = NativeExecutor::new().execute(&request).await.unwrap();

        assert!(output.timed_out());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_deadline_covers_inherited_stdout() {
        // The shell exits at once; the background job holds stdout past the limit.
        let request = sh("sleep 3 & echo hi", "", Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let output = NativeExecutor::new().execute(&request).await.unwrap();

        assert!(output.timed_out());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_large_input_does_not_deadlock() {
        let input = "x".repeat(1024 * 1024);
        let output = NativeExecutor::new()
            .execute(&sh("cat", &input, Some(Duration::from_secs(10))))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.len(), input.len());
    }

    #[tokio::test]
    async fn test_child_ignoring_stdin() {
        let input = "y".repeat(1024 * 1024);
        let output = NativeExecutor::new()
            .execute(&sh("echo done", &input, Some(Duration::from_secs(5))))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout_lossy(), "done\n");
    }

    #[tokio::test]
    async fn test_explicit_environment_only() {
        let mut env = BTreeMap::new();
        env.insert("PATH".to_string(), std::env::var("PATH").unwrap_or_default());
        env.insert("CASE_RUNNER_MARKER".to_string(), "42".to_string());

        let request = ProcessRequest {
            env,
            ..sh("printf '%s' \"$CASE_RUNNER_MARKER\"", "", None)
        };
        let output = NativeExecutor::new().execute(&request).await.unwrap();

        assert_eq!(output.stdout_lossy(), "42");
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let request = ProcessRequest {
            program: "/definitely/not/a/program".to_string(),
            args: vec![],
            cwd: PathBuf::from("/"),
            env: base_env(),
            stdin: Vec::new(),
            timeout: Some(Duration::from_secs(1)),
        };

        let result = NativeExecutor::new().execute(&request).await;
        assert!(matches!(result, Err(ExecError::Launch { .. })));
    }
}
