//! Tick scheduling
//!
//! The controller never sleeps: after a tick it asks a `Scheduler` to call
//! `tick()` again after a delay. The host decides how that happens, a GUI
//! timer or the manual queue below.

use std::time::Duration;

/// Holds at most one pending tick; scheduling again replaces it
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration);
}

/// Deterministic scheduler for tests and headless runs.
/// Requests are only recorded, the caller fires them with [`ManualScheduler::take`].
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pending: Option<Duration>,
    scheduled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<Duration> {
        self.pending
    }

    /// Number of requests made so far, replaced ones included
    pub fn scheduled(&self) -> u64 {
        self.scheduled
    }

    /// Remove the pending request, if any, so it can be fired
    pub fn take(&mut self) -> Option<Duration> {
        self.pending.take()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) {
        self.pending = Some(delay);
        self.scheduled += 1;
    }
}
