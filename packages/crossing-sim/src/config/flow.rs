//! Per-class flow configuration

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crossing_monitor::{TrafficClass, WaveCap};
use serde::{Deserialize, Serialize};

const MAX_UNITS: u32 = 100_000;
const MAX_DELAY_MS: f64 = 3_600_000.0;

/// Arrival stream and crossing behaviour of one traffic class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowConfig {
    /// Units spawned before the driver stops
    pub units: u32,
    /// Mean of the exponential inter-arrival gap
    pub mean_interarrival_ms: f64,
    /// Mean of the normal occupancy duration
    pub crossing_mean_ms: f64,
    /// Standard deviation of the occupancy duration
    pub crossing_stddev_ms: f64,
    /// Wave cap, used by the wave-capped policy
    #[serde(default)]
    pub wave_cap: WaveCap,
}

impl FlowConfig {
    pub fn from_preset(preset: Preset, class: TrafficClass) -> Self {
        use TrafficClass::*;

        match (preset, class) {
            (Preset::Classic, Northbound | Southbound) => Self::vehicles(10, WaveCap::Unlimited),
            (Preset::Classic, Pedestrian) => Self::pedestrians(5, WaveCap::Unlimited),
            (Preset::Capped, Northbound) => Self::vehicles(100, cap(8)),
            (Preset::Capped, Southbound) => Self::vehicles(60, cap(4)),
            (Preset::Capped, Pedestrian) => Self::pedestrians(16, cap(5)),
            (Preset::Quick, Northbound | Southbound) => Self {
                units: 6,
                mean_interarrival_ms: 2.0,
                crossing_mean_ms: 3.0,
                crossing_stddev_ms: 1.0,
                wave_cap: cap(2),
            },
            (Preset::Quick, Pedestrian) => Self {
                units: 3,
                mean_interarrival_ms: 5.0,
                crossing_mean_ms: 6.0,
                crossing_stddev_ms: 2.0,
                wave_cap: cap(1),
            },
        }
    }

    fn vehicles(units: u32, wave_cap: WaveCap) -> Self {
        Self {
            units,
            mean_interarrival_ms: 500.0,
            crossing_mean_ms: 1000.0,
            crossing_stddev_ms: 500.0,
            wave_cap,
        }
    }

    fn pedestrians(units: u32, wave_cap: WaveCap) -> Self {
        Self {
            units,
            mean_interarrival_ms: 5000.0,
            crossing_mean_ms: 10000.0,
            crossing_stddev_ms: 5000.0,
            wave_cap,
        }
    }

    /// Builder: Set units
    pub fn units(mut self, v: u32) -> Self {
        self.units = v;
        self
    }

    /// Builder: Set mean inter-arrival gap
    pub fn mean_interarrival_ms(mut self, v: f64) -> Self {
        self.mean_interarrival_ms = v;
        self
    }

    /// Builder: Set occupancy mean and standard deviation
    pub fn crossing_ms(mut self, mean: f64, stddev: f64) -> Self {
        self.crossing_mean_ms = mean;
        self.crossing_stddev_ms = stddev;
        self
    }

    /// Builder: Set wave cap
    pub fn wave_cap(mut self, v: WaveCap) -> Self {
        self.wave_cap = v;
        self
    }

    pub fn validate(&self, class: TrafficClass) -> ConfigResult<()> {
        if self.units > MAX_UNITS {
            return Err(ConfigError::range_with_hint(
                format!("{}.units", class),
                self.units,
                0,
                MAX_UNITS,
                "Each unit is a thread; keep flows reasonable",
            ));
        }

        let delays = [
            ("mean_interarrival_ms", self.mean_interarrival_ms),
            ("crossing_mean_ms", self.crossing_mean_ms),
            ("crossing_stddev_ms", self.crossing_stddev_ms),
        ];
        for (field, value) in delays {
            if !value.is_finite() || !(0.0..=MAX_DELAY_MS).contains(&value) {
                return Err(ConfigError::range_with_hint(
                    format!("{}.{}", class, field),
                    value,
                    0,
                    MAX_DELAY_MS,
                    "Delays are milliseconds, at most one hour",
                ));
            }
        }
        Ok(())
    }
}

fn cap(n: u32) -> WaveCap {
    WaveCap::limited(n).unwrap_or(WaveCap::Unlimited)
}

/// All-optional flow fields, as found under `flows:` in YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_interarrival_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossing_mean_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossing_stddev_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave_cap: Option<WaveCap>,
}

impl FlowPatch {
    pub fn apply(&self, mut base: FlowConfig) -> FlowConfig {
        if let Some(v) = self.units {
            base.units = v;
        }
        if let Some(v) = self.mean_interarrival_ms {
            base.mean_interarrival_ms = v;
        }
        if let Some(v) = self.crossing_mean_ms {
            base.crossing_mean_ms = v;
        }
        if let Some(v) = self.crossing_stddev_ms {
            base.crossing_stddev_ms = v;
        }
        if let Some(v) = self.wave_cap {
            base.wave_cap = v;
        }
        base
    }
}

impl From<FlowConfig> for FlowPatch {
    fn from(flow: FlowConfig) -> Self {
        Self {
            units: Some(flow.units),
            mean_interarrival_ms: Some(flow.mean_interarrival_ms),
            crossing_mean_ms: Some(flow.crossing_mean_ms),
            crossing_stddev_ms: Some(flow.crossing_stddev_ms),
            wave_cap: Some(flow.wave_cap),
        }
    }
}
