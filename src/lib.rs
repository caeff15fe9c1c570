pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, BodyError, Color, NVec3, StateMatrix};
pub use simulation::forces::{
    accelerations, apply_self_interaction_mask, naive_accelerations, AccelerationField, PairTensor,
};
pub use simulation::integrator::{integrate, Integrator};
pub use simulation::universe::Universe;
pub use simulation::scenario::{Expected, Scenario};
pub use simulation::verification::{
    check_acceleration_methods, forward_back_offset, percent_errors, VerificationError,
    ACCELERATION_TOLERANCE,
};

pub use configuration::config::{
    BodyConfig, ConfigError, EngineConfig, ExpectedConfig, ParametersConfig, ScenarioConfig,
};

pub use benchmark::benchmark::{bench_accelerations, bench_step, filler_bodies, BenchReport};
