//! Newtonian point-mass gravity between two bodies.
//!
//! No softening: the two-body model must fail loudly at zero separation
//! instead of smoothing the singularity away.

use super::params::G;
use super::states::{Body, NVec2};
use crate::error::SimulationError;

pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self { G }
    }
}

impl NewtonianGravity {
    /// Acceleration felt by `on` due to `from`:
    ///   a = G * m_from * r / |r|^3, with r pointing from `on` to `from`
    pub fn acceleration(&self, on: &Body, from: &Body) -> Result<NVec2, SimulationError> {
        let r = from.x - on.x;
        let dist = r.norm();
        if dist == 0.0 {
            return Err(SimulationError::Singularity {
                body: on.name.clone(),
                other: from.name.clone(),
            });
        }

        Ok(self.G * from.m * r / dist.powi(3))
    }
}
