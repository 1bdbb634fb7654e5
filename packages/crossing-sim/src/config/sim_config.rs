//! Simulation configuration
//!
//! Three levels, each overriding the previous:
//! 1. Preset (`SimConfig::preset(Preset::Capped)`)
//! 2. Builder overrides (`.flow(TrafficClass::Pedestrian, |f| f.units(3))`)
//! 3. YAML file (`SimConfig::from_yaml("bridge.yaml")`)

use super::error::{ConfigError, ConfigResult};
use super::flow::{FlowConfig, FlowPatch};
use super::io::{ConfigFileV1, FlowOverrides};
use super::preset::Preset;
use crossing_monitor::{AdmissionPolicy, PerClass, TrafficClass};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: [u32; 1] = [1];
const MAX_TIME_SCALE: f64 = 1000.0;

/// Which fairness gate the monitor runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Unbounded waves, boolean queued marker
    QueuedFlag,
    /// Counted waves limited by each flow's `wave_cap`
    WaveCapped,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::QueuedFlag => "queued_flag",
            PolicyKind::WaveCapped => "wave_capped",
        }
    }
}

/// Complete simulation configuration. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    preset: Preset,
    pub policy: PolicyKind,
    pub flows: PerClass<FlowConfig>,
    /// Seed for the arrival/occupancy RNG streams; `None` draws from entropy
    pub seed: Option<u64>,
    /// Multiplier applied to every sampled delay
    pub time_scale: f64,
}

impl SimConfig {
    /// Start from a preset
    pub fn preset(preset: Preset) -> Self {
        let policy = match preset {
            Preset::Classic => PolicyKind::QueuedFlag,
            Preset::Capped | Preset::Quick => PolicyKind::WaveCapped,
        };
        Self {
            preset,
            policy,
            flows: PerClass::from_fn(|class| FlowConfig::from_preset(preset, class)),
            seed: None,
            time_scale: 1.0,
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    /// Override one class's flow
    pub fn flow(mut self, class: TrafficClass, f: impl FnOnce(FlowConfig) -> FlowConfig) -> Self {
        self.flows[class] = f(self.flows[class]);
        self
    }

    pub fn policy(mut self, kind: PolicyKind) -> Self {
        self.policy = kind;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }

    pub fn total_units(&self) -> u64 {
        self.flows.iter().map(|(_, f)| u64::from(f.units)).sum()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (class, flow) in self.flows.iter() {
            flow.validate(class)?;
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 || self.time_scale > MAX_TIME_SCALE
        {
            return Err(ConfigError::range_with_hint(
                "time_scale",
                self.time_scale,
                0,
                MAX_TIME_SCALE,
                "Must be positive; use e.g. 0.01 to run a preset a hundred times faster",
            ));
        }
        Ok(())
    }

    /// Monitor policy for this configuration
    pub fn admission_policy(&self) -> AdmissionPolicy {
        match self.policy {
            PolicyKind::QueuedFlag => AdmissionPolicy::unbounded(),
            PolicyKind::WaveCapped => AdmissionPolicy::capped(self.flows.map(|_, f| f.wave_cap)),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&file.preset)
            .map_err(|_| ConfigError::UnknownPreset(file.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(policy) = file.policy {
            config.policy = policy;
        }
        config.seed = file.seed;
        if let Some(scale) = file.time_scale {
            config.time_scale = scale;
        }
        if let Some(flows) = file.flows {
            let patches = [
                (TrafficClass::Northbound, flows.northbound),
                (TrafficClass::Southbound, flows.southbound),
                (TrafficClass::Pedestrian, flows.pedestrian),
            ];
            for (class, patch) in patches {
                if let Some(patch) = patch {
                    config.flows[class] = patch.apply(config.flows[class]);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Export the effective configuration as YAML v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: self.preset.to_string(),
            policy: Some(self.policy),
            seed: self.seed,
            time_scale: Some(self.time_scale),
            flows: Some(FlowOverrides {
                northbound: Some(FlowPatch::from(self.flows[TrafficClass::Northbound])),
                southbound: Some(FlowPatch::from(self.flows[TrafficClass::Southbound])),
                pedestrian: Some(FlowPatch::from(self.flows[TrafficClass::Pedestrian])),
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}
