//! Simulation configuration
//!
//! Read once at startup, immutable afterwards:
//! - per-class unit counts
//! - per-class mean inter-arrival interval
//! - per-class mean/stddev occupancy duration
//! - per-class wave cap (or "unbounded")
//!
//! # Examples
//!
//! ```rust,ignore
//! use crossing_sim::config::{Preset, SimConfig};
//!
//! let config = SimConfig::preset(Preset::Capped)
//!     .flow(TrafficClass::Pedestrian, |f| f.units(3))
//!     .seed(42);
//!
//! let config = SimConfig::from_yaml("bridge.yaml")?;
//! ```

pub mod error;
pub mod flow;
pub mod io;
pub mod preset;
pub mod sim_config;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use flow::{FlowConfig, FlowPatch};
pub use io::{ConfigFileV1, FlowOverrides};
pub use preset::Preset;
pub use sim_config::{PolicyKind, SimConfig};
