//! High-level runtime engine settings
//!
//! Selects the pair update order and the checkpoint policy used when
//! building and running a `Simulator`

use crate::configuration::config::{CheckpointConfig, EngineConfig, UpdateOrderConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    pub update_order: UpdateOrderConfig, // sequential or snapshot
    pub checkpoints: CheckpointConfig,   // exact ratio or tick schedule
}

impl From<EngineConfig> for Engine {
    fn from(cfg: EngineConfig) -> Self {
        Self {
            update_order: cfg.update_order,
            checkpoints: cfg.checkpoints,
        }
    }
}
