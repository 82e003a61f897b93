//! Scheduler backed by a Bevy `Timer`, advanced once per frame by the viewer

use std::time::Duration;

use bevy::time::{Timer, TimerMode};

use crate::persistence::scene::SceneStore;
use crate::simulation::engine::{Renderer, SimulationController, TickOutcome};
use crate::simulation::errors::SimError;
use crate::simulation::scheduler::Scheduler;

#[derive(Debug, Clone, Default)]
pub struct TimerScheduler {
    pending: Option<Timer>,
}

impl TimerScheduler {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advance the pending timer by `delta`.
    /// When the requested delay elapses the request is consumed and the part
    /// of `delta` left over after it is returned.
    pub fn advance(&mut self, delta: Duration) -> Option<Duration> {
        let timer = self.pending.as_mut()?;
        let remaining = timer.remaining();
        if delta < remaining {
            timer.tick(delta);
            return None;
        }
        self.pending = None;
        Some(delta - remaining)
    }
}

impl Scheduler for TimerScheduler {
    fn schedule(&mut self, delay: Duration) {
        self.pending = Some(Timer::new(delay, TimerMode::Once));
    }
}

impl<R, P> SimulationController<R, TimerScheduler, P>
where
    R: Renderer,
    P: SceneStore,
{
    /// Spend one frame's `delta` on every tick whose delay elapses within it,
    /// at most `max_ticks`. Returns the ticks advanced.
    pub fn advance_frame(&mut self, delta: Duration, max_ticks: u64) -> Result<u64, SimError> {
        let mut budget = delta;
        let mut advanced = 0;
        while advanced < max_ticks {
            let Some(left) = self.scheduler_mut().advance(budget) else {
                break;
            };
            budget = left;
            if self.tick()? == TickOutcome::Idle {
                break;
            }
            advanced += 1;
        }
        Ok(advanced)
    }
}
