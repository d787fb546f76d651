//! Kinetic energy checkpoints and the channel reports are emitted on.
//!
//! A run is sampled at five checkpoints: 0%, 25%, 50%, 75% and 100% of the
//! total simulated time. Two policies decide when a checkpoint is hit:
//!
//! - `Exact`: the progress ratio `elapsed / (time_step * iteration_count)` is
//!   compared with `==` against the five fractions. Accumulated rounding or a
//!   step that never lands on a quarter silently skips reports.
//! - `Ticks`: the five tick indices are computed up front from the iteration
//!   count (rounded half up), so every report is emitted exactly once.

use std::fmt;

use crate::configuration::config::CheckpointConfig;

/// Fractions of the run at which kinetic energy is reported
pub const CHECKPOINTS: [f64; 5] = [0.0, 0.25, 0.50, 0.75, 1.0];

/// One kinetic energy sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReport {
    pub tick: u64,           // ticks completed when sampled
    pub elapsed_time: f64,   // simulated seconds
    pub progress: f64,       // elapsed / total time
    pub kinetic_energy: f64, // sum over both bodies, joules
}

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ke = self.kinetic_energy;
        if ke != 0.0 && (ke.abs() >= 1e16 || ke.abs() < 1e-4) {
            write!(f, "Total KE: {ke:e} J")
        } else {
            write!(f, "Total KE: {ke} J")
        }
    }
}

/// Receiver of energy reports (stdout, the viewer overlay, a test buffer)
pub trait EnergySink {
    fn report(&mut self, report: &EnergyReport);
}

/// Prints each report on its own line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl EnergySink for StdoutSink {
    fn report(&mut self, report: &EnergyReport) {
        println!("{report}");
    }
}

/// Keeps every report, in emission order
impl EnergySink for Vec<EnergyReport> {
    fn report(&mut self, report: &EnergyReport) {
        self.push(*report);
    }
}

/// Decides whether a checkpoint falls on the current sample
#[derive(Debug, Clone, PartialEq)]
pub enum CheckpointSchedule {
    Exact,
    Ticks(Vec<u64>),
}

impl CheckpointSchedule {
    pub fn new(policy: CheckpointConfig, iteration_count: u64) -> Self {
        match policy {
            CheckpointConfig::Exact => Self::Exact,
            CheckpointConfig::Ticks => {
                let n = iteration_count as u128;
                let mut ticks: Vec<u64> = (0..CHECKPOINTS.len() as u128)
                    .map(|k| ((n * k + 2) / 4) as u64)
                    .collect();
                ticks.dedup();
                Self::Ticks(ticks)
            }
        }
    }

    /// `tick` is the number of completed ticks, `progress` the elapsed ratio
    pub fn is_due(&self, tick: u64, progress: f64) -> bool {
        match self {
            Self::Exact => CHECKPOINTS.iter().any(|&c| progress == c),
            Self::Ticks(ticks) => ticks.binary_search(&tick).is_ok(),
        }
    }
}
