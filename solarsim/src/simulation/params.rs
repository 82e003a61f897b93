//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - physical time simulated per tick (`time_step`),
//! - playback speed, mapped to the delay between ticks,
//! - the gravitational constant `G`

use std::time::Duration;

use super::errors::SimError;

/// Newton's gravitational constant in SI units
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11;

pub const DEFAULT_TIME_STEP: f64 = 1.0;
pub const DEFAULT_SPEED: u32 = 50;
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    time_step: f64, // seconds of physical time per tick
    speed: u32, // 1..=100
    g: f64, // gravitational constant
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            speed: DEFAULT_SPEED,
            g: GRAVITATIONAL_CONSTANT,
        }
    }
}

impl Parameters {
    /// Validated constructor, `speed` is clamped into range
    pub fn new(time_step: f64, speed: u32, g: f64) -> Result<Self, SimError> {
        let mut params = Self::default();
        params.set_time_step(time_step)?;
        params.set_speed(speed);
        if !(g.is_finite() && g > 0.0) {
            return Err(SimError::InvalidGravitationalConstant(g));
        }
        params.g = g;
        Ok(params)
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[allow(non_snake_case)]
    pub fn G(&self) -> f64 {
        self.g
    }

    /// Rejects zero, negative and non-finite steps, keeping the old value
    pub fn set_time_step(&mut self, time_step: f64) -> Result<(), SimError> {
        if !(time_step.is_finite() && time_step > 0.0) {
            return Err(SimError::InvalidTimeStep(time_step));
        }
        self.time_step = time_step;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Delay before the next tick: 101 - speed milliseconds (1..=100 ms)
    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(u64::from(MAX_SPEED + 1 - self.speed))
    }
}
