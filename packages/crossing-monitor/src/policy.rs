//! Admission policies
//!
//! Two variants of the fairness gate:
//! - [`AdmissionPolicy::QueuedFlag`]: one boolean per class, "someone of this
//!   class is queued". Set after the fairness gate, cleared on entry.
//! - [`AdmissionPolicy::WaveCapped`]: one counter per class, the number of
//!   units admitted into the current wave. Reset when the crossing empties,
//!   capped by a per-class [`WaveCap`].

use crate::class::{PerClass, TrafficClass};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Maximum wave size for one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WaveCapRepr", into = "WaveCapRepr")]
pub enum WaveCap {
    Limited(NonZeroU32),
    Unlimited,
}

impl WaveCap {
    /// Limited cap; `None` for zero, which would never admit anyone
    pub fn limited(cap: u32) -> Option<Self> {
        NonZeroU32::new(cap).map(WaveCap::Limited)
    }

    /// Whether a wave already holding `count` members may take one more
    pub fn admits(&self, count: u32) -> bool {
        match self {
            WaveCap::Limited(cap) => count < cap.get(),
            WaveCap::Unlimited => true,
        }
    }

    pub fn get(&self) -> Option<u32> {
        match self {
            WaveCap::Limited(cap) => Some(cap.get()),
            WaveCap::Unlimited => None,
        }
    }
}

impl Default for WaveCap {
    fn default() -> Self {
        WaveCap::Unlimited
    }
}

impl std::fmt::Display for WaveCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveCap::Limited(cap) => write!(f, "{}", cap),
            WaveCap::Unlimited => write!(f, "unbounded"),
        }
    }
}

/// YAML/JSON form: an integer or the keyword "unbounded"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum WaveCapRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<WaveCapRepr> for WaveCap {
    type Error = String;

    fn try_from(repr: WaveCapRepr) -> Result<Self, Self::Error> {
        match repr {
            WaveCapRepr::Count(n) => {
                WaveCap::limited(n).ok_or_else(|| "wave cap must be at least 1".to_string())
            }
            WaveCapRepr::Keyword(k) => match k.to_lowercase().as_str() {
                "unbounded" | "unlimited" | "inf" => Ok(WaveCap::Unlimited),
                _ => Err(format!(
                    "invalid wave cap '{}': expected a positive integer or 'unbounded'",
                    k
                )),
            },
        }
    }
}

impl From<WaveCap> for WaveCapRepr {
    fn from(cap: WaveCap) -> Self {
        match cap {
            WaveCap::Limited(n) => WaveCapRepr::Count(n.get()),
            WaveCap::Unlimited => WaveCapRepr::Keyword("unbounded".to_string()),
        }
    }
}

/// Fairness gate variant used by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    /// Unbounded variant: boolean "queued" marker per class
    QueuedFlag,
    /// Bounded variant: counted waves with a cap per class
    WaveCapped(PerClass<WaveCap>),
}

impl AdmissionPolicy {
    pub fn unbounded() -> Self {
        AdmissionPolicy::QueuedFlag
    }

    /// Same cap for every class
    pub fn uniform(cap: WaveCap) -> Self {
        AdmissionPolicy::WaveCapped(PerClass::splat(cap))
    }

    pub fn capped(caps: PerClass<WaveCap>) -> Self {
        AdmissionPolicy::WaveCapped(caps)
    }

    /// Cap applying to `class`; the flag variant never limits wave size
    pub fn wave_cap(&self, class: TrafficClass) -> WaveCap {
        match self {
            AdmissionPolicy::QueuedFlag => WaveCap::Unlimited,
            AdmissionPolicy::WaveCapped(caps) => caps[class],
        }
    }

    pub fn is_counted(&self) -> bool {
        matches!(self, AdmissionPolicy::WaveCapped(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdmissionPolicy::QueuedFlag => "queued_flag",
            AdmissionPolicy::WaveCapped(_) => "wave_capped",
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        AdmissionPolicy::QueuedFlag
    }
}

impl std::fmt::Display for AdmissionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionPolicy::QueuedFlag => write!(f, "queued_flag"),
            AdmissionPolicy::WaveCapped(caps) => {
                let parts: Vec<String> = caps
                    .iter()
                    .map(|(class, cap)| format!("{}={}", class, cap))
                    .collect();
                write!(f, "wave_capped({})", parts.join(", "))
            }
        }
    }
}
