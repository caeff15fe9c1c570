//! Self-checks for the acceleration field and the integrators.
//!
//! - [`check_acceleration_methods`]: vectorized field vs. naive double loop
//! - [`forward_back_offset`]: how far a run fails to retrace itself
//! - [`percent_errors`]: per-body distance from reference positions

use nalgebra::DVector;
use thiserror::Error;

use crate::simulation::forces::{accelerations, naive_accelerations};
use crate::simulation::integrator::{integrate, Integrator};
use crate::simulation::states::StateMatrix;
use crate::simulation::universe::Universe;

/// Largest acceptable norm of (vectorized - naive), in km/s^2.
pub const ACCELERATION_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerificationError {
    #[error("acceleration methods differ by {difference:e} (tolerance {tolerance:e})")]
    MethodDisagreement { difference: f64, tolerance: f64 },
}

/// Compare both acceleration methods on the same input.
///
/// Returns the Frobenius norm of the difference when it is below
/// [`ACCELERATION_TOLERANCE`].
pub fn check_acceleration_methods(
    positions: &StateMatrix,
    gm: &DVector<f64>,
) -> Result<f64, VerificationError> {
    let difference = (accelerations(positions, gm) - naive_accelerations(positions, gm)).norm();
    if difference.is_nan() || difference >= ACCELERATION_TOLERANCE {
        return Err(VerificationError::MethodDisagreement {
            difference,
            tolerance: ACCELERATION_TOLERANCE,
        });
    }
    Ok(difference)
}

/// Integrate a copy of `universe` forward `steps` steps, reverse every
/// velocity, integrate `steps` more and report how far each body ended up
/// from where it started (km).
///
/// For Verlet / leapfrog this only measures accumulated round-off.
pub fn forward_back_offset(
    universe: &Universe,
    integrator: Integrator,
    dt: f64,
    steps: usize,
) -> Vec<f64> {
    let initial = universe.positions().clone();

    let mut copy = universe.clone();
    integrate(&mut copy, integrator, dt, steps);
    copy.reverse_velocities();
    integrate(&mut copy, integrator, dt, steps);

    (copy.positions() - initial).row_iter().map(|row| row.norm()).collect()
}

/// 100 * |actual_i - expected_i| / |expected_i| for every row.
///
/// A body expected exactly at the origin yields NaN or inf, not an error.
pub fn percent_errors(actual: &StateMatrix, expected: &StateMatrix) -> Vec<f64> {
    assert_eq!(actual.nrows(), expected.nrows(), "row count mismatch");
    (actual - expected)
        .row_iter()
        .zip(expected.row_iter())
        .map(|(diff, reference)| 100.0 * diff.norm() / reference.norm())
        .collect()
}
