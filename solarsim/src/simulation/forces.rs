//! Force contributors for the solar system engine
//!
//! Defines the force-term trait, a set that sums several terms into each
//! body's force accumulator, and direct pairwise Newtonian gravity.
//! Direct summation is O(n^2) per evaluation, fine for tens of bodies.

use super::errors::SimError;
use super::states::{Body, NVec2};

/// Collection of force terms (gravity, drag, etc.)
/// Each term implements [`ForceTerm`] and their contributions are summed
/// into a single force vector per body
pub struct ForceSet {
    terms: Vec<Box<dyn ForceTerm + Send + Sync>>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Force set holding only Newtonian gravity with constant `g`
    pub fn gravity(g: f64) -> Self {
        Self::new().with(NewtonianGravity { G: g })
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: ForceTerm + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Recompute `f` for every body from the current positions.
    /// All terms are evaluated before any body is written, so on error
    /// the bodies keep their previous forces.
    pub fn accumulate_forces(&self, bodies: &mut [Body]) -> Result<(), SimError> {
        // Zero buffer
        let mut out = vec![NVec2::zeros(); bodies.len()];
        for term in &self.terms {
            term.force(bodies, &mut out)?;
        }
        for (b, f) in bodies.iter_mut().zip(out) {
            b.f = f;
        }
        Ok(())
    }
}

/// Trait for force sources operating on a body list
/// Implementations add their contribution into `out[i]` for each body
pub trait ForceTerm {
    fn force(&self, bodies: &[Body], out: &mut [NVec2]) -> Result<(), SimError>;
}

/// Pairwise Newtonian gravity without softening
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
}

impl ForceTerm for NewtonianGravity {
    fn force(&self, bodies: &[Body], out: &mut [NVec2]) -> Result<(), SimError> {
        for (i, bi) in bodies.iter().enumerate() {
            let mut f = NVec2::zeros();

            // Every other body pulls on bi. Bodies are told apart by index,
            // two bodies with equal coordinates are still two bodies.
            for (j, bj) in bodies.iter().enumerate() {
                if i == j {
                    continue;
                }

                // d points from bj to bi, the pull on bi is along -d
                let d = bi.x - bj.x;
                let r = (d.x * d.x + d.y * d.y).sqrt();
                if r == 0.0 {
                    return Err(SimError::DegenerateGeometry { first: i, second: j });
                }

                // |F| = G * m_i * m_j / r^2
                let magnitude = self.G * bi.m * bj.m / (r * r);

                f.x += -d.x * magnitude / r;
                f.y += -d.y * magnitude / r;
            }

            out[i] += f;
        }
        Ok(())
    }
}

/// Recompute every body's force with gravity alone
#[allow(non_snake_case)]
pub fn compute_forces(bodies: &mut [Body], G: f64) -> Result<(), SimError> {
    ForceSet::gravity(G).accumulate_forces(bodies)
}
