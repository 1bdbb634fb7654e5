//! Configuration I/O (YAML schema)
//!
//! Defines YAML schema types. Loading and export live in sim_config.rs.

use super::flow::FlowPatch;
use super::sim_config::PolicyKind;
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1). Optional only so a missing field
    /// gets a dedicated error.
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_scale: Option<f64>,

    /// Per-class overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<FlowOverrides>,
}

/// Flow overrides keyed by class name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub northbound: Option<FlowPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub southbound: Option<FlowPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedestrian: Option<FlowPatch>,
}
