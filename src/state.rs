//! Process-wide run state.
//!
//! Single writer: the ingestion side replaces the current problem, the
//! orchestrator owns the run flag and phase. Readers get a snapshot.

use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use crate::core::domain::{ProblemRecord, RunPhase};

#[derive(Debug, Default)]
pub struct SessionState {
    current: RwLock<Option<Arc<ProblemRecord>>>,
    phase: RwLock<RunPhase>,
    running: AtomicBool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current problem wholesale.
    pub fn set_problem(&self, problem: ProblemRecord) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(Arc::new(problem));
    }

    pub fn problem(&self) -> Option<Arc<ProblemRecord>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear_problem(&self) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }

    pub fn phase(&self) -> RunPhase {
        *self.phase.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_phase(&self, phase: RunPhase) {
        *self.phase.write().unwrap_or_else(|e| e.into_inner()) = phase;
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the exclusive-run flag; `None` while another run holds it.
    pub fn try_begin_run(&self) -> Option<RunPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit { state: self })
    }
}

/// Releases the exclusive-run flag when dropped, on every exit path.
#[derive(Debug)]
pub struct RunPermit<'a> {
    state: &'a SessionState,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.state.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(name: &str) -> ProblemRecord {
        ProblemRecord {
            contest_id: "abc300".to_string(),
            task_id: "abc300_a".to_string(),
            name: name.to_string(),
            interactive: false,
            time_limit: 2000,
            cases: vec![],
        }
    }

    #[test]
    fn test_problem_lifecycle() {
        let state = SessionState::new();
        assert!(state.problem().is_none());

        state.set_problem(problem("first"));
        let snapshot = state.problem().unwrap();
        state.set_problem(problem("second"));

        assert_eq!(snapshot.name, "first");
        assert_eq!(state.problem().unwrap().name, "second");

        state.clear_problem();
        assert!(state.problem().is_none());
    }

    #[test]
    fn test_run_permit_is_exclusive() {
        let state = SessionState::new();

        let permit = state.try_begin_run().unwrap();
        assert!(state.is_running());
        assert!(state.try_begin_run().is_none());

        drop(permit);
        assert!(!state.is_running());
        assert!(state.try_begin_run().is_some());
    }

    #[test]
    fn test_run_permit_released_on_panic() {
        let state = SessionState::new();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _permit = state.try_begin_run().unwrap();
            panic!("boom");
        }));

        assert!(result.is_err());
        assert!(!state.is_running());
    }
}
