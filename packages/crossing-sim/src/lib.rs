/*
 * Crossing Simulation - Randomized Traffic Against the Admission Monitor
 *
 * Drives one AdmissionMonitor with three concurrent arrival streams and
 * reports how the crossing was shared.
 *
 * Architecture:
 * - config/   : Presets, per-class flows, YAML v1 files
 * - delay/    : Seeded exponential/normal delay streams
 * - driver/   : One thread per unit, one driver per class
 * - harness/  : Wiring, joining, run report
 * - error/    : SimError + category
 */

#![allow(clippy::should_implement_trait)] // Preset::from_str naming intentional

pub mod config;
pub mod delay;
pub mod driver;
pub mod error;
pub mod harness;

// Re-exports
pub use config::{FlowConfig, PolicyKind, Preset, SimConfig};
pub use delay::DelaySampler;
pub use driver::{DriverReport, FlowDriver};
pub use error::{ErrorCategory, Result, SimError};
pub use harness::{Simulation, SimulationReport};
