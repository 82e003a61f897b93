//! Configuration types for loading simulator settings from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of the
//! simulator settings. A configuration consists of:
//!
//! - [`ParametersConfig`] – time step, playback speed and gravitational constant
//! - [`WindowConfig`]     – size of the drawing canvas
//! - [`SimulatorConfig`]  – top-level wrapper, plus an optional startup scene
//!
//! # YAML format
//! Every key is optional, missing keys take the defaults shown here:
//!
//! ```yaml
//! parameters:
//!   time_step: 1.0          # physical seconds per tick
//!   speed: 50               # 1..=100, delay between ticks is 101 - speed ms
//!   G: 6.67408e-11          # gravitational constant
//!
//! window:
//!   width: 800
//!   height: 800
//!
//! scene: one_satellite.txt  # scene file loaded at startup
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::simulation::errors::SimError;
use crate::simulation::params::{
    Parameters, DEFAULT_SPEED, DEFAULT_TIME_STEP, GRAVITATIONAL_CONSTANT,
};

/// Numerical and physical parameters
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    pub time_step: f64, // physical time per tick
    pub speed: u32, // playback speed
    #[serde(rename = "G")]
    pub gravitational_constant: f64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            speed: DEFAULT_SPEED,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
        }
    }
}

impl ParametersConfig {
    /// Validate into runtime [`Parameters`]; speed is clamped, not rejected
    pub fn build(&self) -> Result<Parameters, SimError> {
        Parameters::new(self.time_step, self.speed, self.gravitational_constant)
    }
}

/// Canvas size in logical pixels
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
        }
    }
}

/// Top-level simulator configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub parameters: ParametersConfig,
    pub window: WindowConfig,
    pub scene: Option<PathBuf>, // scene loaded before the first frame
}

impl SimulatorConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid simulator configuration")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open config {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("invalid simulator configuration in {}", path.display()))
    }
}
