//! Core state types for the solar system simulation.
//!
//! Defines the 2D body/system structs:
//! - `BodyKind` closed set of celestial object kinds
//! - `Body` one star or planet using `NVec2`
//! - `System` the ordered body list plus the accumulated physical time `t`

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;

use super::errors::SimError;

pub type NVec2 = Vector2<f64>;

/// Kind of celestial object. Kinds behave identically under gravity and only
/// matter for drawing and for the scene file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Planet,
}

impl BodyKind {
    /// Name used when writing scene files
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BodyKind {
    type Err = String;

    /// Case-insensitive; the unrecognised token is handed back as the error
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "star" => Ok(BodyKind::Star),
            "planet" => Ok(BodyKind::Planet),
            _ => Err(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub kind: BodyKind, // star or planet
    pub radius: f64, // display radius in pixels
    pub color: String, // display color name
    pub m: f64, // mass, always > 0
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub f: NVec2, // force accumulated for the current step
}

impl Body {
    /// Build a validated body at rest force-wise.
    /// Mass must be finite and positive, radius finite and non-negative,
    /// color a non-empty token without whitespace.
    pub fn new(
        kind: BodyKind,
        radius: f64,
        color: impl Into<String>,
        m: f64,
        x: NVec2,
        v: NVec2,
    ) -> Result<Self, SimError> {
        if !(m.is_finite() && m > 0.0) {
            return Err(SimError::InvalidMass(m));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        let color = color.into();
        if color.is_empty() || color.chars().any(char::is_whitespace) {
            return Err(SimError::InvalidColor(color));
        }
        Ok(Self {
            kind,
            radius,
            color,
            m,
            x,
            v,
            f: NVec2::zeros(),
        })
    }

    /// Linear momentum m * v
    pub fn momentum(&self) -> NVec2 {
        self.m * self.v
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // load order is preserved
    pub t: f64, // physical time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    /// Largest |x| or |y| over all bodies; used to fit the scene on screen
    pub fn extent(&self) -> Result<f64, SimError> {
        if self.bodies.is_empty() {
            return Err(SimError::EmptyScene);
        }
        Ok(self
            .bodies
            .iter()
            .map(|b| b.x.x.abs().max(b.x.y.abs()))
            .fold(0.0, f64::max))
    }

    /// Total linear momentum of the system
    pub fn momentum(&self) -> NVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }
}
