//! Fixed-step time integration for the body list
//!
//! Semi-implicit (symplectic) Euler: the velocity is kicked first and the
//! position drifts with the new velocity. The order is part of the
//! numerical behaviour and must not be swapped.

use super::errors::SimError;
use super::forces::ForceSet;
use super::states::Body;

/// Advance one body by `dt` using the force already stored in `body.f`
pub fn step(body: &mut Body, dt: f64) {
    // x axis: a = F/m, v += a dt, x += v dt
    let ax = body.f.x / body.m;
    body.v.x += ax * dt;
    body.x.x += body.v.x * dt;

    // y axis, independent of x
    let ay = body.f.y / body.m;
    body.v.y += ay * dt;
    body.x.y += body.v.y * dt;
}

/// Advance the whole body list by one step.
/// Forces for every body are computed from the pre-step positions first,
/// then every body is integrated. On a force fault nothing moves.
pub fn recalculate(bodies: &mut [Body], forces: &ForceSet, dt: f64) -> Result<(), SimError> {
    forces.accumulate_forces(bodies)?;

    for b in bodies.iter_mut() {
        step(b, dt);
    }
    Ok(())
}
