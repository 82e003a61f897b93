//! Simulation faults
//!
//! Raised by body construction, force evaluation and the controller.
//! Scene file problems live in `persistence::scene::SceneError`.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Two distinct bodies share a position, the inverse-square law is undefined
    DegenerateGeometry { first: usize, second: usize },
    /// Mass must be finite and > 0
    InvalidMass(f64),
    /// Radius must be finite and >= 0
    InvalidRadius(f64),
    /// Color must be a single non-empty token so scene files read back
    InvalidColor(String),
    /// Time step must be finite and > 0
    InvalidTimeStep(f64),
    /// Gravitational constant must be finite and > 0
    InvalidGravitationalConstant(f64),
    /// Extent of a scene with no bodies
    EmptyScene,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateGeometry { first, second } => write!(
                f,
                "bodies {first} and {second} occupy the same position, force is undefined"
            ),
            SimError::InvalidMass(m) => write!(f, "mass must be positive, got {m}"),
            SimError::InvalidRadius(r) => write!(f, "radius must be non-negative, got {r}"),
            SimError::InvalidColor(c) => {
                write!(f, "color must be one word without whitespace, got {c:?}")
            }
            SimError::InvalidTimeStep(dt) => write!(f, "time step must be positive, got {dt}"),
            SimError::InvalidGravitationalConstant(g) => {
                write!(f, "gravitational constant must be positive, got {g}")
            }
            SimError::EmptyScene => f.write_str("scene has no bodies"),
        }
    }
}

impl Error for SimError {}
