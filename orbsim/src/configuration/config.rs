//! Scenario loading for the two-body simulation.
//!
//! Two on-disk formats map onto the same [`ScenarioConfig`]:
//!
//! - plain text (`.txt` and anything that is not YAML): the first line holds
//!   `<iteration_count>;<time_step>`, each following line describes one body
//!   as `<name>;<mass>;<pos_x>;<pos_y>;<vel_x>;<vel_y>`
//! - YAML (`.yaml` / `.yml`), which can also carry engine options and display
//!   radii:
//!
//! ```yaml
//! engine:
//!   update_order: "sequential"   # or "snapshot"
//!   checkpoints: "exact"         # or "ticks"
//!
//! parameters:
//!   iteration_count: 1000
//!   time_step: 10.0              # seconds
//!
//! bodies:
//!   - name: Mars
//!     m: 6.4171e23
//!     x: [0.0, 0.0]
//!     v: [0.0, 0.0]
//!     radius: 7.0e5              # display only
//!   - name: Phobos
//!     m: 1.0659e16
//!     x: [9234000.0, 0.0]
//!     v: [0.0, 2138.0]
//! ```
//!
//! Either way the result is validated before the simulator is built, so a
//! malformed file never gets as far as the first step.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ConfigError;

/// Order in which the two bodies are advanced inside one tick
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum UpdateOrderConfig {
    #[default]
    #[serde(rename = "sequential")] // body 1 sees body 0's already-updated position
    Sequential,

    #[serde(rename = "snapshot")] // both bodies see the previous tick's positions
    Snapshot,
}

/// How kinetic energy checkpoints are detected
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CheckpointConfig {
    #[default]
    #[serde(rename = "exact")] // progress ratio compared for exact equality
    Exact,

    #[serde(rename = "ticks")] // tick indices precomputed from the iteration count
    Ticks,
}

/// Engine options, all optional in the YAML format
#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub update_order: UpdateOrderConfig,
    #[serde(default)]
    pub checkpoints: CheckpointConfig,
}

/// Run length and step size
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub iteration_count: u64, // number of ticks in a full run
    pub time_step: f64,       // seconds per tick
}

/// Initial state of one body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub m: f64,      // mass in kg
    pub x: Vec<f64>, // position in m
    pub v: Vec<f64>, // velocity in m/s
    #[serde(default)]
    pub radius: Option<f64>, // display radius in m, never used by the physics
}

/// Top-level scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

const HEADER_FIELDS: usize = 2;
const BODY_FIELDS: usize = 6;

impl ScenarioConfig {
    /// Parse the semicolon separated text format
    pub fn from_text(src: &str) -> Result<Self, ConfigError> {
        let mut lines = src
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or(ConfigError::Empty)?;
        let header = split_fields(header_line, header, HEADER_FIELDS)?;
        let iteration_count = header[0]
            .parse::<u64>()
            .map_err(|_| invalid(header_line, "iteration_count", header[0]))?;
        let time_step = parse_f64(header_line, "time_step", header[1])?;

        let mut bodies = Vec::new();
        for (line, text) in lines {
            let f = split_fields(line, text, BODY_FIELDS)?;
            bodies.push(BodyConfig {
                name: f[0].to_string(),
                m: parse_f64(line, "mass", f[1])?,
                x: vec![parse_f64(line, "pos_x", f[2])?, parse_f64(line, "pos_y", f[3])?],
                v: vec![parse_f64(line, "vel_x", f[4])?, parse_f64(line, "vel_y", f[5])?],
                radius: None,
            });
        }

        let cfg = Self {
            engine: EngineConfig::default(),
            parameters: ParametersConfig { iteration_count, time_step },
            bodies,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse the YAML format
    pub fn from_yaml(src: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(src)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the simulator relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parameters;
        if p.iteration_count == 0 {
            return Err(non_positive("iteration_count", 0.0));
        }
        if !(p.time_step > 0.0 && p.time_step.is_finite()) {
            return Err(non_positive("time_step", p.time_step));
        }
        if self.bodies.len() != 2 {
            return Err(ConfigError::BodyCount(self.bodies.len()));
        }
        for b in &self.bodies {
            if !b.m.is_finite() {
                return Err(non_finite(&format!("mass of {}", b.name), b.m));
            }
            if !(b.m > 0.0) {
                return Err(non_positive(&format!("mass of {}", b.name), b.m));
            }
            for (field, vec) in [("x", &b.x), ("v", &b.v)] {
                if vec.len() != 2 {
                    return Err(ConfigError::Dimension {
                        body: b.name.clone(),
                        field,
                        found: vec.len(),
                    });
                }
                if let Some(&c) = vec.iter().find(|c| !c.is_finite()) {
                    return Err(non_finite(&format!("{field} of {}", b.name), c));
                }
            }
            if let Some(r) = b.radius {
                if !r.is_finite() {
                    return Err(non_finite(&format!("radius of {}", b.name), r));
                }
                if !(r > 0.0) {
                    return Err(non_positive(&format!("radius of {}", b.name), r));
                }
            }
        }
        Ok(())
    }
}

/// Load a scenario from disk, choosing the format from the file extension
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, ConfigError> {
    let src = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => ScenarioConfig::from_yaml(&src),
        _ => ScenarioConfig::from_text(&src),
    }
}

fn split_fields<'a>(line: usize, text: &'a str, expected: usize) -> Result<Vec<&'a str>, ConfigError> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    if fields.len() != expected {
        return Err(ConfigError::FieldCount { line, expected, found: fields.len() });
    }
    Ok(fields)
}

fn parse_f64(line: usize, field: &'static str, value: &str) -> Result<f64, ConfigError> {
    match value.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(invalid(line, field, value)),
    }
}

fn invalid(line: usize, field: &'static str, value: &str) -> ConfigError {
    ConfigError::InvalidNumber { line, field, value: value.to_string() }
}

fn non_positive(field: &str, value: f64) -> ConfigError {
    ConfigError::NonPositive { field: field.to_string(), value }
}

fn non_finite(field: &str, value: f64) -> ConfigError {
    ConfigError::NonFinite { field: field.to_string(), value }
}
