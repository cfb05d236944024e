//! Wall-clock budget helpers for abortable planning.

use std::time::{Duration, Instant};

/// Return the remaining time budget until the provided deadline.
///
/// Returns `None` once the deadline has passed.
pub fn remaining_budget(deadline: Instant) -> Option<Duration> {
    let remaining = deadline
        .checked_duration_since(Instant::now())
        .unwrap_or(Duration::from_secs(0));
    if remaining.is_zero() {
        return None;
    }
    Some(remaining)
}

/// Planning ran past its time budget before all sequences were scored.
///
/// Raised between sequence evaluations, so the live world is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "planning timed out after {}ms ({evaluated}/{generated} sequences scored)",
    .budget.as_millis()
)]
pub struct PlanningTimedOut {
    pub budget: Duration,
    /// Sequences scored before the deadline.
    pub evaluated: usize,
    /// Sequences generated in total.
    pub generated: usize,
}
