//! Numerical parameters for a run
//!
//! `Parameters` holds the run length, the fixed step size and the total
//! simulated duration derived from them.

use crate::error::ConfigError;

/// Newtonian gravitational constant (m^3 kg^-1 s^-2)
pub const G: f64 = 6.67430e-11;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub iteration_count: u64, // ticks in a full run
    pub time_step: f64,       // seconds per tick
}

impl Parameters {
    /// time_step * iteration_count, the denominator of the progress ratio
    pub fn total_time(&self) -> f64 {
        self.time_step * self.iteration_count as f64
    }

    /// Both values must be strictly positive, the step also finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iteration_count == 0 {
            return Err(ConfigError::NonPositive { field: "iteration_count".into(), value: 0.0 });
        }
        if !(self.time_step > 0.0 && self.time_step.is_finite()) {
            return Err(ConfigError::NonPositive { field: "time_step".into(), value: self.time_step });
        }
        Ok(())
    }
}
