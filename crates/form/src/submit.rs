//! Submission lifecycle: at most one request in flight.

/// Phase of the submission handler.
///
/// `Idle` is both the initial and the terminal phase; every submission
/// returns to it through [`SubmitGuard::finish`] regardless of outcome.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Mutual exclusion for the submit control.
///
/// Mirrors the disabled state of the submit button: while a request is
/// outstanding no second submission can begin.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    phase: SubmitPhase,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters `Submitting`. Returns false when a submission is already
    /// outstanding, in which case the caller must not proceed.
    #[must_use]
    pub fn begin(&mut self) -> bool {
        if self.phase == SubmitPhase::Submitting {
            return false;
        }
        self.phase = SubmitPhase::Submitting;
        true
    }

    /// Returns to `Idle`. Must run on every exit path, including failures.
    pub fn finish(&mut self) {
        self.phase = SubmitPhase::Idle;
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmitGuard, SubmitPhase};

    #[test]
    fn begins_idle() {
        let guard = SubmitGuard::new();
        assert_eq!(guard.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn refuses_reentry_while_submitting() {
        let mut guard = SubmitGuard::new();
        assert!(guard.begin());
        assert!(!guard.begin());
        assert!(guard.is_submitting());
    }

    #[test]
    fn finish_restores_idle_after_every_cycle() {
        let mut guard = SubmitGuard::new();
        for _ in 0..3 {
            assert!(guard.begin());
            guard.finish();
            assert_eq!(guard.phase(), SubmitPhase::Idle);
        }
    }
}
