//! Core state types for the N-body simulation.
//!
//! - `Body`: one point mass as supplied by the caller (km, km/s, km^3/s^2)
//! - `NVec3`: 3d vector used for a single body's position / velocity
//! - `StateMatrix`: N x 3 matrix, row i = body i, used by `Universe`

use nalgebra::{MatrixXx3, Vector3};
use thiserror::Error;

pub type NVec3 = Vector3<f64>;
pub type StateMatrix = MatrixXx3<f64>;

/// Display tag carried along with a body. Never read by the physics.
pub type Color = [u8; 3];

/// Physically meaningless body data. Reported to the caller, never panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BodyError {
    #[error("body `{name}` has a negative gravitational parameter ({gm} km^3/s^2)")]
    NegativeGravitationalParameter { name: String, gm: f64 },

    #[error("body `{name}` has a non-finite {field}")]
    NonFinite { name: String, field: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    pub position: NVec3, // km
    pub velocity: NVec3, // km/s
    pub gm: f64,         // G * mass, km^3/s^2
    pub color: Color,
}

impl Body {
    pub fn new(
        name: impl Into<String>,
        position: [f64; 3],
        velocity: [f64; 3],
        gm: f64,
        color: Color,
    ) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
            velocity: velocity.into(),
            gm,
            color,
        }
    }

    /// Check the body for values no physical system can have.
    ///
    /// The simulation itself will happily integrate a negative GM (it just
    /// becomes a repulsive source), so this is opt-in for callers that build
    /// bodies from untrusted input.
    pub fn validate(&self) -> Result<(), BodyError> {
        let non_finite = |field| BodyError::NonFinite {
            name: self.name.clone(),
            field,
        };

        if !self.position.iter().all(|c| c.is_finite()) {
            return Err(non_finite("position"));
        }
        if !self.velocity.iter().all(|c| c.is_finite()) {
            return Err(non_finite("velocity"));
        }
        if !self.gm.is_finite() {
            return Err(non_finite("gravitational parameter"));
        }
        if self.gm < 0.0 {
            return Err(BodyError::NegativeGravitationalParameter {
                name: self.name.clone(),
                gm: self.gm,
            });
        }
        Ok(())
    }

    /// Acceleration on `self` due to `other` alone.
    ///
    /// a = GM_other / |d|^2 * d / |d|, with d pointing from self to other.
    /// Undefined (NaN) when both bodies sit at the same position.
    pub fn calc_accel(&self, other: &Body) -> NVec3 {
        pair_acceleration(&self.position, &other.position, other.gm)
    }
}

/// Acceleration at `xi` due to a source of strength `gm_j` at `xj`.
pub(crate) fn pair_acceleration(xi: &NVec3, xj: &NVec3, gm_j: f64) -> NVec3 {
    let displacement = xj - xi;
    let magnitude = displacement.norm();
    let direction = displacement / magnitude;
    direction * (gm_j / (magnitude * magnitude))
}
