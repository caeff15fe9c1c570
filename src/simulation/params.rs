//! Numerical parameters for a simulation run
//!
//! `Parameters` holds runtime settings:
//! - integration step size `h0` in seconds (negative runs backward),
//! - total simulated span `t_end` in seconds

#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64, // step size
    pub t_end: f64, // time end, always positive
}

impl Parameters {
    /// Whole steps of `|h0|` that fit in `t_end`.
    pub fn steps(&self) -> usize {
        (self.t_end / self.h0.abs()).floor() as usize
    }
}
