//! Reading problems handed over by the ingestion side.

use std::path::{Path, PathBuf};

use crate::{
    config::RunSettings,
    core::domain::{ProblemRecord, TestCase},
    paths::resolve_tests_dir,
};

#[derive(Debug, thiserror::Error)]
pub enum ProblemError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid problem file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a problem record; relative fixture paths are taken against `root`.
pub fn load_problem(path: &Path, root: &Path) -> Result<ProblemRecord, ProblemError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ProblemError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut problem: ProblemRecord =
        serde_json::from_str(&raw).map_err(|source| ProblemError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    for case in problem.cases.iter_mut() {
        if case.input_path.is_relative() {
            case.input_path = root.join(&case.input_path);
        }
        if case.output_path.is_relative() {
            case.output_path = root.join(&case.output_path);
        }
    }
    problem.cases.sort_by_key(|case| case.index);

    Ok(problem)
}

/// Collects `N.in` fixtures (with `N.out` as the expected side) ordered by N.
/// A missing directory yields no cases.
pub fn discover_cases(tests_dir: &Path) -> Result<Vec<TestCase>, ProblemError> {
    let entries = match std::fs::read_dir(tests_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ProblemError::Read {
                path: tests_dir.to_path_buf(),
                source,
            });
        }
    };

    let mut cases: Vec<TestCase> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension()? != "in" || !path.is_file() {
                return None;
            }
            let index: u32 = path.file_stem()?.to_str()?.parse().ok()?;
            Some(TestCase {
                index,
                output_path: tests_dir.join(format!("{}.out", index)),
                input_path: path,
            })
        })
        .collect();
    cases.sort_by_key(|case| case.index);

    Ok(cases)
}

/// Fills in cases from the conventional tests directory when the record has none.
pub fn with_discovered_cases(
    mut problem: ProblemRecord,
    root: &Path,
    settings: &RunSettings,
) -> Result<ProblemRecord, ProblemError> {
    if problem.cases.is_empty() {
        let tests_dir = resolve_tests_dir(
            root,
            &settings.contest_base_dir,
            &problem.contest_id,
            &problem.task_id,
            &settings.tests_dir,
        );
        problem.cases = discover_cases(&tests_dir)?;
        tracing::debug!(
            "Discovered {} cases in {}",
            problem.cases.len(),
            tests_dir.display()
        );
    }
    Ok(problem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_cases_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.in", "10.out", "2.in", "1.in", "1.out", "notes.txt", "x.in"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let cases = discover_cases(dir.path()).unwrap();
        let indices: Vec<_> = cases.iter().map(|c| c.index).collect();

        assert_eq!(indices, vec![1, 2, 10]);
        assert_eq!(cases[1].output_path, dir.path().join("2.out"));
        assert!(!cases[1].output_path.exists());
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_cases(&dir.path().join("tests")).unwrap().is_empty());
    }

    #[test]
    fn test_load_problem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problem.json");
        std::fs::write(
            &path,
            r#"{
                "contestId": "abc300",
                "taskId": "abc300_a",
                "name": "A - N-choice question",
                "timeLimit": 2000,
                "cases": [
                    { "index": 2, "inputPath": "t/2.in", "outputPath": "/abs/2.out" },
                    { "index": 1, "inputPath": "t/1.in", "outputPath": "t/1.out" }
                ]
            }"#,
        )
        .unwrap();

        let problem = load_problem(&path, Path::new("/work")).unwrap();

        assert!(!problem.interactive);
        assert_eq!(problem.time_limit, 2000);
        assert_eq!(problem.cases[0].index, 1);
        assert_eq!(problem.cases[0].input_path, PathBuf::from("/work/t/1.in"));
        assert_eq!(problem.cases[1].output_path, PathBuf::from("/abs/2.out"));
    }

    #[test]
    fn test_with_discovered_cases() {
        let dir = tempfile::tempdir().unwrap();
        let tests_dir = dir.path().join("abc300").join("abc300_a").join("tests");
        std::fs::create_dir_all(&tests_dir).unwrap();
        std::fs::write(tests_dir.join("1.in"), "1\n").unwrap();

        let problem = ProblemRecord {
            contest_id: "abc300".to_string(),
            task_id: "abc300_a".to_string(),
            name: "A".to_string(),
            interactive: false,
            time_limit: 2000,
            cases: vec![],
        };

        let problem =
            with_discovered_cases(problem, dir.path(), &RunSettings::default()).unwrap();
        assert_eq!(problem.cases.len(), 1);
        assert_eq!(problem.cases[0].input_path, tests_dir.join("1.in"));
    }
}
