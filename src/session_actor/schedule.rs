use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// How long each automatic phase lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Simulated payment latency, `Processing -> Confirmed`.
    pub processing: Duration,
    /// How long the confirmation stays up, `Confirmed -> Idle`.
    pub confirmation: Duration,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            processing: Duration::from_millis(1000),
            confirmation: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimedTransition {
    SettlePayment,
    DismissConfirmation,
}

/// A transition the session will apply once `at` is reached.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScheduledTransition {
    pub at: Instant,
    pub kind: TimedTransition,
}

impl ScheduledTransition {
    pub fn after(start: Instant, delay: Duration, kind: TimedTransition) -> Self {
        Self { at: start + delay, kind }
    }
}

/// Resolves at `deadline`, or never when nothing is scheduled.
pub(crate) async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
