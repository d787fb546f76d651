pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{ConfigError, SimulationError};

pub use simulation::states::{Body, NVec2};
pub use simulation::params::{Parameters, G};
pub use simulation::engine::Engine;
pub use simulation::forces::NewtonianGravity;
pub use simulation::integrator::semi_implicit_euler;
pub use simulation::energy::{CheckpointSchedule, EnergyReport, EnergySink, StdoutSink, CHECKPOINTS};
pub use simulation::simulator::Simulator;

pub use configuration::config::{
    load_scenario, BodyConfig, CheckpointConfig, EngineConfig, ParametersConfig, ScenarioConfig, UpdateOrderConfig,
};

pub use visualization::viewer2d::{display_radii, run_2d, EnergyLog};

pub use benchmark::benchmark::{bench_update_orders, BenchResult};
