use std::time::Instant;

use nalgebra::DVector;

use crate::simulation::forces::{naive_accelerations, AccelerationField};
use crate::simulation::integrator::{integrate, Integrator};
use crate::simulation::states::{Body, StateMatrix};
use crate::simulation::universe::Universe;

/// Seconds per call for each acceleration method.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub bodies: usize,
    pub iters: usize,
    pub vectorized_secs: f64,
    pub naive_secs: f64,
}

impl BenchReport {
    pub fn vectorized_per_sec(&self) -> f64 {
        1.0 / self.vectorized_secs
    }

    pub fn naive_per_sec(&self) -> f64 {
        1.0 / self.naive_secs
    }

    /// How many times faster the vectorized field is than the naive loop.
    pub fn speedup(&self) -> f64 {
        self.naive_secs / self.vectorized_secs
    }
}

/// `m` extra light bodies spread over a few AU.
/// Deterministic positions, no rand needed.
pub fn filler_bodies(m: usize) -> Vec<Body> {
    (0..m)
        .map(|i| {
            let i_f = i as f64 + 1.0;
            Body::new(
                format!("filler-{i}"),
                [
                    (i_f * 0.37).sin() * 5.0e8,
                    (i_f * 0.13).cos() * 5.0e8,
                    (i_f * 0.07).sin() * 5.0e7,
                ],
                [0.0, 0.0, 0.0],
                1.0e3,
                [255, 255, 155],
            )
        })
        .collect()
}

fn time_per_iter(warmup: usize, iters: usize, mut f: impl FnMut()) -> f64 {
    for _ in 0..warmup {
        f();
    }
    let t0 = Instant::now();
    for _ in 0..iters {
        f();
    }
    t0.elapsed().as_secs_f64() / iters.max(1) as f64
}

/// Time the vectorized field (reused buffers) against the naive double loop
/// on the same bodies.
pub fn bench_accelerations(bodies: &[Body], warmup: usize, iters: usize) -> BenchReport {
    let n = bodies.len();
    let gm = DVector::from_iterator(n, bodies.iter().map(|b| b.gm));
    let positions = StateMatrix::from_fn(n, |i, k| bodies[i].position[k]);

    let mut field = AccelerationField::new(n);
    let mut out = StateMatrix::zeros(n);

    let vectorized_secs = time_per_iter(warmup, iters, || {
        field.evaluate_into(&positions, &gm, &mut out);
    });
    let naive_secs = time_per_iter(warmup, iters, || {
        std::hint::black_box(naive_accelerations(&positions, &gm));
    });

    BenchReport {
        bodies: n,
        iters,
        vectorized_secs,
        naive_secs,
    }
}

/// Seconds per step of `integrator` on a fresh universe built from `bodies`.
pub fn bench_step(bodies: &[Body], integrator: Integrator, dt: f64, steps: usize) -> f64 {
    let mut universe = Universe::new(bodies);
    let t0 = Instant::now();
    integrate(&mut universe, integrator, dt, steps);
    t0.elapsed().as_secs_f64() / steps.max(1) as f64
}
