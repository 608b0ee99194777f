pub const DEFAULT_PYTHON_COMMAND: &str = "python";
pub const DEFAULT_PYPY_COMMAND: &str = "pypy3";
pub const DEFAULT_CPP_COMPILE_COMMAND: &str = "cpp_compile";
pub const DEFAULT_CPP_RUN_COMMAND: &str = "cpp_run";
pub const DEFAULT_CODON_COMMAND: &str = "codon";
pub const DEFAULT_CODON_OUTPUT_NAME: &str = "main_codon";
pub const DEFAULT_TESTS_DIR: &str = "tests";

pub const PYTHON_SOURCE_FILE: &str = "main.py";
pub const CPP_SOURCE_FILE: &str = "main.cpp";
pub const CPP_ARTIFACT_FILE: &str = "a.out";

/// Exposes the resolved root directory to build and run helper scripts.
pub const WORKSPACE_DIR_ENV: &str = "WORKSPACE_DIR";

pub const RUNTIME_ENV: &str = "CASE_RUNNER_RUNTIME";
pub const TIMEOUT_ENV: &str = "CASE_RUNNER_TIMEOUT_MS";

/// Emitted by PyPy on machines where it cannot detect the cache sizes.
pub const PYPY_CACHE_WARNING: &str = "Warning: cannot find your CPU L2 & L3 cache size";

/// How long to keep draining pipes after a timed-out child was killed.
pub const PIPE_DRAIN_GRACE_MS: u64 = 200;
