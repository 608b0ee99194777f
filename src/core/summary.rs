use chrono::Utc;
use itertools::Itertools;

use crate::core::domain::{RunResult, RunSummary, Verdict};

/// Folds per-case results into counts by verdict.
pub fn summarize(results: &[RunResult], duration_ms: u64) -> RunSummary {
    let counts = results.iter().map(|result| result.verdict).counts();
    let count = |verdict| counts.get(&verdict).copied().unwrap_or(0);

    RunSummary {
        total: results.len(),
        passed: count(Verdict::Accepted),
        wrong_answers: count(Verdict::WrongAnswer),
        timeouts: count(Verdict::TimeLimitExceeded),
        runtime_errors: count(Verdict::RuntimeError),
        duration_ms,
        finished_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(index: u32, verdict: Verdict) -> RunResult {
        RunResult {
            index,
            verdict,
            duration_ms: 10,
            actual: String::new(),
            console: String::new(),
        }
    }

    #[test]
    fn test_counts_by_verdict() {
        let results = vec![
            result(1, Verdict::Accepted),
            result(2, Verdict::WrongAnswer),
            result(3, Verdict::Accepted),
            result(4, Verdict::TimeLimitExceeded),
            result(5, Verdict::RuntimeError),
        ];

        let summary = summarize(&results, 250);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.wrong_answers, 1);
        assert_eq!(summary.timeouts, 1);
        assert_eq!(summary.runtime_errors, 1);
        assert_eq!(summary.duration_ms, 250);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_empty_results() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.passed, 0);
        assert!(!summary.all_passed());
    }
}
