//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the live `Universe` at t = 0
//! - optional reference positions to score the final state against

use tracing::{debug, info, warn};

use crate::configuration::config::{vec3, ConfigError, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, StateMatrix};
use crate::simulation::universe::Universe;
use crate::simulation::verification::percent_errors;

/// Reference positions for a subset of the bodies, in the reporting frame.
#[derive(Debug, Clone)]
pub struct Expected {
    pub indices: Vec<usize>, // row in the universe for each expected row
    pub positions: StateMatrix,
}

/// The main "runtime bundle" constructed from a [`ScenarioConfig`]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub universe: Universe,
    pub expected: Option<Expected>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        // Bodies: map `BodyConfig` -> runtime `Body`, rejecting bad shapes / GM
        let bodies = cfg
            .bodies
            .iter()
            .map(|bc| bc.to_body())
            .collect::<Result<Vec<Body>, _>>()?;

        let universe = Universe::new(&bodies);

        let p_cfg = cfg.parameters;
        if !p_cfg.h0.is_finite() || p_cfg.h0 == 0.0 {
            return Err(ConfigError::InvalidStep(p_cfg.h0));
        }
        if !p_cfg.t_end.is_finite() {
            return Err(ConfigError::InvalidSpan(p_cfg.t_end));
        }
        let parameters = Parameters {
            h0: p_cfg.h0,
            t_end: p_cfg.t_end.abs(),
        };

        let lookup = |name: &str| {
            universe
                .index_of(name)
                .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
        };

        let reference_body = cfg.engine.reference_body.as_deref().map(lookup).transpose()?;
        let engine = Engine {
            integrator: cfg.engine.integrator,
            reference_body,
        };

        let expected = if cfg.expected.is_empty() {
            None
        } else {
            let mut indices = Vec::with_capacity(cfg.expected.len());
            let mut rows = Vec::with_capacity(cfg.expected.len());
            for ec in &cfg.expected {
                indices.push(lookup(&ec.name)?);
                rows.push(vec3(&ec.name, "x", &ec.x)?);
            }
            let positions = StateMatrix::from_fn(rows.len(), |i, k| rows[i][k]);
            Some(Expected { indices, positions })
        };

        debug!(
            bodies = universe.len(),
            integrator = ?engine.integrator,
            h0 = parameters.h0,
            steps = parameters.steps(),
            "scenario built"
        );

        Ok(Self {
            engine,
            parameters,
            universe,
            expected,
        })
    }

    /// Perform every configured step.
    pub fn run(&mut self) {
        let steps = self.parameters.steps();
        let dt = self.parameters.h0;
        let integrator = self.engine.integrator;
        let report_every = (steps / 10).max(1);

        info!(steps, dt, ?integrator, bodies = self.universe.len(), "simulation started");

        for step in 1..=steps {
            self.universe.step(integrator, dt);
            if step % report_every == 0 {
                info!(step, t = self.universe.time(), "progress");
            }
        }

        if !self.universe.is_finite() {
            warn!(t = self.universe.time(), "state has diverged to inf/NaN");
        }
        info!(t = self.universe.time(), "simulation finished");
    }

    /// Current positions in the reporting frame.
    pub fn final_positions(&self) -> StateMatrix {
        match self.engine.reference_body {
            Some(origin) => self.universe.positions_relative_to(origin),
            None => self.universe.positions().clone(),
        }
    }

    /// Percent error |actual - expected| / |expected| * 100 for each expected
    /// body, paired with the body's universe index.
    pub fn percent_errors(&self) -> Option<Vec<(usize, f64)>> {
        let expected = self.expected.as_ref()?;
        let all = self.final_positions();
        let actual =
            StateMatrix::from_fn(expected.indices.len(), |r, k| all[(expected.indices[r], k)]);
        let errors = percent_errors(&actual, &expected.positions);
        Some(expected.indices.iter().copied().zip(errors).collect())
    }
}
