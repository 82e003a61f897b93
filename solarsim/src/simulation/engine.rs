//! Simulation controller
//!
//! Owns the body list, the parameters and the run state, and drives
//! force evaluation plus integration one tick at a time. Drawing, timing
//! and scene files are reached through the `Renderer`, `Scheduler` and
//! `SceneStore` handed over at construction.

use std::path::Path;

use bevy::log::{debug, error, info};

use super::errors::SimError;
use super::forces::ForceSet;
use super::integrator::recalculate;
use super::params::Parameters;
use super::scheduler::{ManualScheduler, Scheduler};
use super::states::{Body, System};
use crate::persistence::scene::{SceneError, SceneStore, UnknownKindWarning};

/// Read-side hook for whatever draws the bodies
pub trait Renderer {
    /// The body list was replaced wholesale
    fn scene_loaded(&mut self, system: &System);
    /// A tick finished, positions and physical time are up to date
    fn redraw(&mut self, system: &System);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
}

/// What a call to [`SimulationController::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Controller was stopped, nothing changed and nothing was scheduled
    Idle,
    /// Bodies moved by one time step and the next tick was scheduled
    Advanced,
}

pub struct SimulationController<R, S, P> {
    system: System, // bodies + physical time
    parameters: Parameters,
    forces: ForceSet,
    state: RunState,
    renderer: R,
    scheduler: S,
    store: P,
}

impl<R, S, P> SimulationController<R, S, P>
where
    R: Renderer,
    S: Scheduler,
    P: SceneStore,
{
    /// Empty, stopped controller using gravity with `parameters.G()`
    pub fn new(parameters: Parameters, renderer: R, scheduler: S, store: P) -> Self {
        let forces = ForceSet::gravity(parameters.G());
        Self {
            system: System::default(),
            parameters,
            forces,
            state: RunState::Stopped,
            renderer,
            scheduler,
            store,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.system.bodies
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn physical_time(&self) -> f64 {
        self.system.t
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn set_time_step(&mut self, time_step: f64) -> Result<(), SimError> {
        self.parameters.set_time_step(time_step)
    }

    /// Clamped into 1..=100, takes effect from the next scheduled tick
    pub fn set_speed(&mut self, speed: u32) {
        self.parameters.set_speed(speed);
    }

    /// Stopped -> Running, then tick immediately. No-op when already running.
    pub fn start(&mut self) -> Result<TickOutcome, SimError> {
        if self.is_running() {
            return Ok(TickOutcome::Idle);
        }
        self.state = RunState::Running;
        info!("Started execution...");
        self.tick()
    }

    /// Running -> Stopped. A tick that is already scheduled still fires but
    /// finds the controller stopped and does nothing.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!("Paused execution.");
        }
        self.state = RunState::Stopped;
    }

    /// Scheduler callback. Advances one time step and schedules the next
    /// tick while running. A force fault stops the controller and leaves
    /// positions, velocities and physical time untouched.
    pub fn tick(&mut self) -> Result<TickOutcome, SimError> {
        if !self.is_running() {
            return Ok(TickOutcome::Idle);
        }

        let dt = self.parameters.time_step();
        if let Err(e) = recalculate(&mut self.system.bodies, &self.forces, dt) {
            error!("tick at t = {} failed: {e}", self.system.t);
            self.state = RunState::Stopped;
            return Err(e);
        }
        self.system.t += dt;
        debug!("t = {:.1}, {} bodies", self.system.t, self.system.bodies.len());

        self.renderer.redraw(&self.system);
        self.scheduler.schedule(self.parameters.tick_delay());
        Ok(TickOutcome::Advanced)
    }

    /// Replace the scene with `bodies` and reset physical time.
    /// Stops the controller first so no tick sees a half-swapped list.
    pub fn load_bodies(&mut self, bodies: Vec<Body>) {
        self.stop();
        self.system = System::new(bodies);
        self.renderer.scene_loaded(&self.system);
    }

    /// Load a scene through the store. On error the current scene is kept;
    /// the controller is stopped either way.
    pub fn load(&mut self, path: &Path) -> Result<Vec<UnknownKindWarning>, SceneError> {
        self.stop();
        let scene = self.store.load(path)?;
        self.load_bodies(scene.bodies);
        Ok(scene.warnings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        self.store.save(path, &self.system.bodies)
    }
}

impl<R, P> SimulationController<R, ManualScheduler, P>
where
    R: Renderer,
    P: SceneStore,
{
    /// Fire pending ticks back to back, ignoring their delays, until `limit`
    /// ticks have advanced or nothing is pending. Returns the ticks advanced.
    pub fn run_pending(&mut self, limit: u64) -> Result<u64, SimError> {
        let mut advanced = 0;
        while advanced < limit && self.scheduler.take().is_some() {
            if self.tick()? == TickOutcome::Advanced {
                advanced += 1;
            }
        }
        Ok(advanced)
    }
}
