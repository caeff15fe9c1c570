//! High-level runtime engine settings
//!
//! Selects the integrator and the frame positions are reported in
//! when building and running a `Scenario`

use crate::simulation::integrator::Integrator;

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: Integrator, // update rule used for every step
    pub reference_body: Option<usize>, // report positions relative to this body, if any
}
