use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use case_runner::config::{FileSettings, SettingsSource};
use case_runner::core::pipeline::running::Orchestrator;
use case_runner::native::executor::NativeExecutor;
use case_runner::problem::{load_problem, with_discovered_cases};
use case_runner::runtime::RuntimeRegistry;
use case_runner::sinks::LogSink;
use case_runner::state::SessionState;

/// Run a solution against its sample cases.
#[derive(Debug, Parser)]
#[command(name = "case-runner", version, about)]
struct Cli {
    /// Problem record (JSON) to run.
    #[arg(long)]
    problem: PathBuf,

    /// Workspace root; contest directories are resolved under it.
    #[arg(long, env = "CASE_RUNNER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Settings file; defaults apply when omitted or missing.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run a single case instead of all of them.
    #[arg(long = "case")]
    case: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    set_panic_hook();

    let cli = Cli::parse();
    let root = std::path::absolute(&cli.root)?;

    let settings = Arc::new(FileSettings::new(cli.settings.as_ref()));
    let problem = load_problem(&cli.problem, &root)?;
    let problem = with_discovered_cases(problem, &root, &settings.load()?)?;

    let state = Arc::new(SessionState::new());
    state.set_problem(problem);

    let orchestrator = Orchestrator::new(
        root,
        state,
        settings,
        Arc::new(RuntimeRegistry::new(Arc::new(NativeExecutor::new()))),
        Arc::new(LogSink),
    );

    let outcome = match cli.case {
        Some(index) => orchestrator.run_one(index).await,
        None => orchestrator.run_all().await,
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    for result in &outcome.results {
        println!("#{} {} ({}ms)", result.index, result.verdict, result.duration_ms);
    }
    let summary = &outcome.summary;
    println!(
        "{}/{} passed, {} TLE, {} RE in {}ms",
        summary.passed, summary.total, summary.timeouts, summary.runtime_errors, summary.duration_ms
    );

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
