//! Live simulation state for a fixed set of bodies.
//!
//! The universe keeps its own copy of everything it mutates: bodies handed to
//! [`Universe::new`] are copied into N x 3 matrices and the caller's values are
//! never touched by stepping.

use nalgebra::DVector;
use tracing::debug;

use crate::simulation::forces::{naive_accelerations, AccelerationField};
use crate::simulation::integrator::Integrator;
use crate::simulation::states::{Body, NVec3, StateMatrix};

#[derive(Debug, Clone)]
pub struct Universe {
    bodies: Vec<Body>, // construction snapshot: names, colors, initial state
    pub(crate) gm: DVector<f64>,
    pub(crate) positions: StateMatrix,
    pub(crate) velocities: StateMatrix,
    // always the field evaluated at `positions`
    pub(crate) accelerations: StateMatrix,
    pub(crate) field: AccelerationField,
    pub(crate) t: f64,
}

impl Universe {
    /// Build a universe from `bodies`, evaluating the initial accelerations
    /// so that velocity-Verlet has a valid a_n on its very first step.
    pub fn new(bodies: &[Body]) -> Self {
        let n = bodies.len();
        let bodies = bodies.to_vec();

        let gm = DVector::from_iterator(n, bodies.iter().map(|b| b.gm));
        let positions = StateMatrix::from_fn(n, |i, k| bodies[i].position[k]);
        let velocities = StateMatrix::from_fn(n, |i, k| bodies[i].velocity[k]);

        let mut field = AccelerationField::new(n);
        let accelerations = field.evaluate(&positions, &gm);

        debug!(bodies = n, "universe constructed");

        Self {
            bodies,
            gm,
            positions,
            velocities,
            accelerations,
            field,
            t: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Simulated seconds elapsed since construction (negative when stepping
    /// backward).
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Bodies exactly as supplied at construction. The live state is in
    /// [`positions`](Self::positions) / [`velocities`](Self::velocities).
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Current state of body `i` as a standalone value.
    pub fn body(&self, i: usize) -> Body {
        Body {
            position: self.positions.row(i).transpose(),
            velocity: self.velocities.row(i).transpose(),
            ..self.bodies[i].clone()
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn gm(&self) -> &DVector<f64> {
        &self.gm
    }

    pub fn positions(&self) -> &StateMatrix {
        &self.positions
    }

    pub fn velocities(&self) -> &StateMatrix {
        &self.velocities
    }

    /// Velocities may be edited freely; accelerations depend on positions
    /// only, so the cached field stays valid.
    pub fn velocities_mut(&mut self) -> &mut StateMatrix {
        &mut self.velocities
    }

    /// Flip every velocity. Integrating forward afterwards retraces the
    /// trajectory for time-reversible schemes.
    pub fn reverse_velocities(&mut self) {
        self.velocities.neg_mut();
    }

    /// Accelerations at the current positions (km/s^2), from the cache.
    pub fn accelerations(&self) -> &StateMatrix {
        &self.accelerations
    }

    /// Evaluate the vectorized field afresh at the current positions.
    pub fn evaluate_accelerations(&self) -> StateMatrix {
        AccelerationField::new(self.len()).evaluate(&self.positions, &self.gm)
    }

    /// Reference double-loop evaluation at the current positions.
    pub fn naive_accelerations(&self) -> StateMatrix {
        naive_accelerations(&self.positions, &self.gm)
    }

    /// Positions with body `origin` moved to (0, 0, 0).
    pub fn positions_relative_to(&self, origin: usize) -> StateMatrix {
        let center = self.positions.row(origin).clone_owned();
        let mut relative = self.positions.clone();
        for mut row in relative.row_iter_mut() {
            row -= &center;
        }
        relative
    }

    /// False once any position or velocity has become inf or NaN.
    pub fn is_finite(&self) -> bool {
        self.positions.iter().chain(self.velocities.iter()).all(|c| c.is_finite())
    }

    /// Total energy scaled by G (km^5/s^4):
    /// sum(1/2 gm_i |v_i|^2) - sum_{i<j} gm_i gm_j / r_ij
    pub fn energy(&self) -> f64 {
        let n = self.len();
        let mut kinetic = 0.0;
        let mut potential = 0.0;
        for i in 0..n {
            kinetic += 0.5 * self.gm[i] * self.velocities.row(i).norm_squared();
            let xi: NVec3 = self.positions.row(i).transpose();
            for j in (i + 1)..n {
                let r = (self.positions.row(j).transpose() - xi).norm();
                potential -= self.gm[i] * self.gm[j] / r;
            }
        }
        kinetic + potential
    }

    /// Linear momentum scaled by G: sum(gm_i * v_i).
    pub fn momentum(&self) -> NVec3 {
        self.velocities
            .row_iter()
            .zip(self.gm.iter())
            .fold(NVec3::zeros(), |p, (v, gm)| p + v.transpose() * *gm)
    }

    /// Advance by one step of `dt` seconds with the given scheme.
    pub fn step(&mut self, integrator: Integrator, dt: f64) {
        integrator.step(self, dt);
    }
}
