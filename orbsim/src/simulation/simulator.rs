//! Build and drive a two-body run from configuration
//!
//! Takes a `ScenarioConfig` and produces a `Simulator` containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the two bodies at t = 0
//! - the kinetic energy checkpoint schedule
//!
//! The simulator is inserted into Bevy as a `Resource` by the viewer, and
//! driven by a plain loop in headless mode. It has no knowledge of either.

use bevy::prelude::Resource;

use crate::configuration::config::{BodyConfig, ScenarioConfig, UpdateOrderConfig};
use crate::error::{ConfigError, SimulationError};
use crate::simulation::energy::{CheckpointSchedule, EnergyReport, EnergySink};
use crate::simulation::engine::Engine;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec2};

/// Runtime bundle for one two-body run
#[derive(Resource, Debug, Clone)]
pub struct Simulator {
    engine: Engine,
    parameters: Parameters,
    bodies: [Body; 2],
    elapsed_time: f64, // simulated seconds, += time_step per tick
    tick: u64,         // ticks completed
    started: bool,     // initial checkpoint evaluated
    schedule: CheckpointSchedule,
}

impl Simulator {
    /// Rejects a zero iteration count, a non-positive step and bodies with
    /// a non-positive mass or a non-finite state
    pub fn new(engine: Engine, parameters: Parameters, bodies: [Body; 2]) -> Result<Self, ConfigError> {
        parameters.validate()?;
        for body in &bodies {
            body.validate()?;
        }

        let schedule = CheckpointSchedule::new(engine.checkpoints, parameters.iteration_count);
        Ok(Self {
            engine,
            parameters,
            bodies,
            elapsed_time: 0.0,
            tick: 0,
            started: false,
            schedule,
        })
    }

    /// Build from a configuration, validating it first
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let body = |bc: &BodyConfig| {
            Body::new(bc.name.clone(), bc.m, NVec2::new(bc.x[0], bc.x[1]), NVec2::new(bc.v[0], bc.v[1]))
        };

        let parameters = Parameters {
            iteration_count: cfg.parameters.iteration_count,
            time_step: cfg.parameters.time_step,
        };

        Self::new(cfg.engine.into(), parameters, [body(&cfg.bodies[0]), body(&cfg.bodies[1])])
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn parameters(&self) -> Parameters {
        self.parameters
    }

    /// Switch the pair update order; the checkpoint schedule is unaffected
    pub fn set_update_order(&mut self, order: UpdateOrderConfig) {
        self.engine.update_order = order;
    }

    pub fn bodies(&self) -> &[Body; 2] {
        &self.bodies
    }

    pub fn positions(&self) -> [NVec2; 2] {
        [self.bodies[0].x, self.bodies[1].x]
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.parameters.iteration_count
    }

    /// Fraction of the run completed, as used by the exact checkpoint policy
    pub fn progress(&self) -> f64 {
        self.elapsed_time / self.parameters.total_time()
    }

    /// Sum of 0.5 * m * |v|^2 over both bodies
    pub fn total_kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Advance both bodies by one tick and return their new positions.
    ///
    /// The first call also samples the initial state at progress 0.
    pub fn step(&mut self, sink: &mut dyn EnergySink) -> Result<[NVec2; 2], SimulationError> {
        if self.is_finished() {
            return Err(SimulationError::Exhausted(self.parameters.iteration_count));
        }
        if !self.started {
            self.started = true;
            self.report_kinetic_energy_if_due(sink);
        }

        // Work on a copy so a failed tick leaves the previous state intact
        let dt = self.parameters.time_step;
        let mut next = self.bodies.clone();
        let [first, second] = &mut next;
        match self.engine.update_order {
            UpdateOrderConfig::Sequential => {
                first.update(second, dt)?;
                second.update(first, dt)?;
            }
            UpdateOrderConfig::Snapshot => {
                first.update(&self.bodies[1], dt)?;
                second.update(&self.bodies[0], dt)?;
            }
        }

        self.bodies = next;
        self.elapsed_time += dt;
        self.tick += 1;
        self.report_kinetic_energy_if_due(sink);

        Ok(self.positions())
    }

    /// Emit the total kinetic energy if the current sample is a checkpoint
    pub fn report_kinetic_energy_if_due(&self, sink: &mut dyn EnergySink) {
        let progress = self.progress();
        if self.schedule.is_due(self.tick, progress) {
            sink.report(&EnergyReport {
                tick: self.tick,
                elapsed_time: self.elapsed_time,
                progress,
                kinetic_energy: self.total_kinetic_energy(),
            });
        }
    }

    /// Drive every remaining tick and return the final positions
    pub fn run(&mut self, sink: &mut dyn EnergySink) -> Result<[NVec2; 2], SimulationError> {
        while !self.is_finished() {
            self.step(sink)?;
        }
        Ok(self.positions())
    }
}
