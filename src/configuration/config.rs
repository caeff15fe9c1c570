//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator choice and reporting frame
//! - [`ParametersConfig`] – step size and total simulated span
//! - [`BodyConfig`]       – initial state for each body
//! - [`ExpectedConfig`]   – optional reference positions to compare against
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A two-body scenario matching these types:
//!
//! ```yaml
//! engine:
//!   integrator: verlet      # euler | explicit_euler | verlet | leapfrog | rk4
//!   reference_body: Sun     # optional
//!
//! parameters:
//!   h0: 3600.0              # step size in seconds, negative runs backward
//!   t_end: 31557600.0       # total simulated span in seconds
//!
//! bodies:
//!   - name: Sun
//!     x: [0.0, 0.0, 0.0]    # km
//!     v: [0.0, 0.0, 0.0]    # km/s
//!     gm: 132712440041.93938
//!     color: [255, 255, 0]
//!   - name: Earth
//!     x: [-6.460466571450332E+07, 1.322145017754471E+08, -6.309428925409913E+03]
//!     v: [-2.725423398965551E+01, -1.317899134460998E+01, 8.656734598035953E-04]
//!     gm: 398600.435436
//! ```
//!
//! The engine then maps this configuration into its runtime `Scenario`,
//! where bodies live in matrices rather than in these per-body structs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::integrator::Integrator;
use crate::simulation::states::{Body, BodyError, Color};

/// Everything that can go wrong turning a YAML file into a runnable scenario.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("body `{body}`: `{field}` must have 3 components, got {len}")]
    Dimension {
        body: String,
        field: &'static str,
        len: usize,
    },

    #[error("invalid body `{name}`")]
    Body {
        name: String,
        #[source]
        source: BodyError,
    },

    #[error("no body named `{0}` in the scenario")]
    UnknownBody(String),

    #[error("step size h0 must be finite and non-zero, got {0}")]
    InvalidStep(f64),

    #[error("simulated span t_end must be finite, got {0}")]
    InvalidSpan(f64),
}

/// Integrator choice and reporting frame.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: Integrator, // update rule, Euler-Cromer when omitted
    #[serde(default)]
    pub reference_body: Option<String>, // name of the body reported at the origin
}

/// Step size and total simulated time.
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64,    // time step size in seconds, sign selects direction
    pub t_end: f64, // simulated span in seconds
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub x: Vec<f64>, // position, km
    pub v: Vec<f64>, // velocity, km/s
    pub gm: f64,     // gravitational parameter, km^3/s^2
    #[serde(default = "default_color")]
    pub color: Color, // display tag, passed through untouched
}

/// Known position of a body after the run, e.g. from an ephemeris.
#[derive(Deserialize, Debug, Clone)]
pub struct ExpectedConfig {
    pub name: String,
    pub x: Vec<f64>, // km, in the reporting frame
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub expected: Vec<ExpectedConfig>,
}

fn default_color() -> Color {
    [255, 255, 255]
}

/// Copy a YAML vector into a fixed 3-array, rejecting any other length.
pub(crate) fn vec3(
    body: &str,
    field: &'static str,
    values: &[f64],
) -> Result<[f64; 3], ConfigError> {
    <[f64; 3]>::try_from(values).map_err(|_| ConfigError::Dimension {
        body: body.to_string(),
        field,
        len: values.len(),
    })
}

impl BodyConfig {
    /// Convert to a runtime `Body`, checking shape and physical sanity.
    pub fn to_body(&self) -> Result<Body, ConfigError> {
        let body = Body::new(
            self.name.clone(),
            vec3(&self.name, "x", &self.x)?,
            vec3(&self.name, "v", &self.v)?,
            self.gm,
            self.color,
        );
        body.validate().map_err(|source| ConfigError::Body {
            name: self.name.clone(),
            source,
        })?;
        Ok(body)
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
