//! Core state type for the two-body simulation.
//!
//! A `Body` carries the physical state of one celestial object and knows how
//! to advance itself under the pull of another body.

use nalgebra::Vector2;

use super::forces::NewtonianGravity;
use super::integrator::semi_implicit_euler;
use crate::error::{ConfigError, SimulationError};

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String, // identifier, also used for the legend
    pub x: NVec2,     // position (m)
    pub v: NVec2,     // velocity (m/s)
    pub m: f64,       // mass (kg), always > 0
}

impl Body {
    pub fn new(name: impl Into<String>, m: f64, x: NVec2, v: NVec2) -> Self {
        Self { name: name.into(), x, v, m }
    }

    /// Advance this body by `dt` under the gravity of `other`.
    ///
    /// Uses `other` exactly as passed in: the caller decides whether that is
    /// the other body's pre- or post-update state. Fails on zero separation
    /// and whenever the new state would not be finite; on failure the body
    /// keeps its previous state.
    pub fn update(&mut self, other: &Body, dt: f64) -> Result<(), SimulationError> {
        let a = NewtonianGravity::default().acceleration(self, other)?;
        let (x, v) = semi_implicit_euler(self.x, self.v, a, dt);

        if !(x.iter().all(|c| c.is_finite()) && v.iter().all(|c| c.is_finite())) {
            return Err(SimulationError::NonFinite { body: self.name.clone() });
        }
        self.x = x;
        self.v = v;
        Ok(())
    }

    /// Mass must be finite and positive, position and velocity finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.m.is_finite() {
            return Err(ConfigError::NonFinite { field: format!("mass of {}", self.name), value: self.m });
        }
        if !(self.m > 0.0) {
            return Err(ConfigError::NonPositive { field: format!("mass of {}", self.name), value: self.m });
        }
        for (field, vec) in [("x", &self.x), ("v", &self.v)] {
            if let Some(&c) = vec.iter().find(|c| !c.is_finite()) {
                return Err(ConfigError::NonFinite { field: format!("{field} of {}", self.name), value: c });
            }
        }
        Ok(())
    }

    /// 0.5 * m * |v|^2 in joules
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}
