//! Fixed-step time integrators for the N-body universe
//!
//! Every scheme starts from the cached accelerations a_n (the field at the
//! current positions) and finishes by refreshing that cache at x_n+1, so the
//! cache is always valid for whichever scheme runs next. A negative `dt`
//! integrates backward in time.
//!
//! Nothing here checks for NaN or inf: a diverging trajectory is a property of
//! the bodies and step size, and it is left visible in the state.

use clap::ValueEnum;
use serde::Deserialize;

use crate::simulation::universe::Universe;

/// Which update rule advances the state. Chosen explicitly by the caller.
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Semi-implicit Euler (Euler-Cromer): velocity first, then position with
    /// the new velocity. The default Euler flavour.
    #[default]
    #[serde(rename = "euler", alias = "euler_cromer")]
    #[value(name = "euler", alias = "euler-cromer")]
    Euler,

    /// Explicit (forward) Euler: position with the old velocity, then
    /// velocity. Gains energy every orbit; kept for comparison.
    #[serde(rename = "explicit_euler")]
    #[value(name = "explicit-euler")]
    ExplicitEuler,

    /// Velocity Verlet. Symplectic, time-reversible, second order.
    #[serde(rename = "verlet")]
    #[value(name = "verlet")]
    VelocityVerlet,

    /// Kick-drift-kick leapfrog. Same trajectory as velocity Verlet.
    #[serde(rename = "leapfrog")]
    #[value(name = "leapfrog")]
    Leapfrog,

    /// Classical 4th-order Runge-Kutta. Four field evaluations per step,
    /// not symplectic.
    #[serde(rename = "rk4")]
    #[value(name = "rk4")]
    RungeKutta4,
}

impl Integrator {
    /// Advance `universe` by one step of `dt` seconds.
    pub fn step(self, universe: &mut Universe, dt: f64) {
        match self {
            Integrator::Euler => euler_cromer(universe, dt),
            Integrator::ExplicitEuler => explicit_euler(universe, dt),
            Integrator::VelocityVerlet => velocity_verlet(universe, dt),
            Integrator::Leapfrog => leapfrog(universe, dt),
            Integrator::RungeKutta4 => runge_kutta_4(universe, dt),
        }
    }

    /// New field evaluations performed by one step.
    pub fn evaluations_per_step(self) -> usize {
        match self {
            Integrator::RungeKutta4 => 4,
            _ => 1,
        }
    }

    /// Whether the scheme is symplectic (and therefore time-reversible).
    pub fn is_symplectic(self) -> bool {
        matches!(self, Integrator::VelocityVerlet | Integrator::Leapfrog)
    }
}

/// Run `steps` consecutive steps. Returns the universe time afterwards.
pub fn integrate(universe: &mut Universe, integrator: Integrator, dt: f64, steps: usize) -> f64 {
    for _ in 0..steps {
        integrator.step(universe, dt);
    }
    universe.time()
}

/// Re-evaluate the field at the current positions into the cache.
fn refresh_accelerations(u: &mut Universe) {
    u.field.evaluate_into(&u.positions, &u.gm, &mut u.accelerations);
}

/// Euler-Cromer:
/// v_n+1 = v_n + dt * a_n
/// x_n+1 = x_n + dt * v_n+1
pub fn euler_cromer(u: &mut Universe, dt: f64) {
    u.velocities += &u.accelerations * dt;
    u.positions += &u.velocities * dt;
    u.t += dt;

    refresh_accelerations(u);
}

/// Explicit Euler:
/// x_n+1 = x_n + dt * v_n
/// v_n+1 = v_n + dt * a_n
pub fn explicit_euler(u: &mut Universe, dt: f64) {
    u.positions += &u.velocities * dt;
    u.velocities += &u.accelerations * dt;
    u.t += dt;

    refresh_accelerations(u);
}

/// Velocity Verlet, reusing the cached a_n as a_1:
/// x_n+1 = x_n + dt * v_n + dt^2/2 * a_1
/// a_2   = a(x_n+1)
/// v_n+1 = v_n + dt/2 * (a_1 + a_2)
pub fn velocity_verlet(u: &mut Universe, dt: f64) {
    u.positions += &u.velocities * dt + &u.accelerations * (dt * dt * 0.5);
    u.t += dt;

    let a_2 = u.field.evaluate(&u.positions, &u.gm);
    u.velocities += (&u.accelerations + &a_2) * (0.5 * dt);
    u.accelerations = a_2;
}

/// Kick-drift-kick leapfrog.
pub fn leapfrog(u: &mut Universe, dt: f64) {
    let half_dt = 0.5 * dt;

    // Kick: v_n+1/2 = v_n + (dt/2) * a_n
    u.velocities += &u.accelerations * half_dt;

    // Drift: x_n+1 = x_n + dt * v_n+1/2
    u.positions += &u.velocities * dt;
    u.t += dt;

    // a_n+1 from x_n+1
    refresh_accelerations(u);

    // Kick: v_n+1 = v_n+1/2 + (dt/2) * a_n+1
    u.velocities += &u.accelerations * half_dt;
}

/// Classical RK4 over the coupled system x' = v, v' = a(x).
///
/// k1 is the cached a_n; k2..k4 are evaluated at the intermediate positions
/// and the final evaluation refreshes the cache.
pub fn runge_kutta_4(u: &mut Universe, dt: f64) {
    let half_dt = 0.5 * dt;

    let k1_v = u.accelerations.clone();
    let k1_x = u.velocities.clone();

    let k2_v = u.field.evaluate(&(&u.positions + &k1_x * half_dt), &u.gm);
    let k2_x = &u.velocities + &k1_v * half_dt;

    let k3_v = u.field.evaluate(&(&u.positions + &k2_x * half_dt), &u.gm);
    let k3_x = &u.velocities + &k2_v * half_dt;

    let k4_v = u.field.evaluate(&(&u.positions + &k3_x * dt), &u.gm);
    let k4_x = &u.velocities + &k3_v * dt;

    u.velocities += (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);
    u.positions += (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0);
    u.t += dt;

    refresh_accelerations(u);
}
