//! Preset configurations
//!
//! Presets provide complete default configurations for common runs.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Few units, unbounded waves (queued-flag policy)
    ///
    /// - Vehicles: 10 per direction, one every 0.5s, crossing 1s ± 0.5s
    /// - Pedestrians: 5, one every 5s, crossing 10s ± 5s
    Classic,

    /// Heavy traffic, capped waves
    ///
    /// - Northbound: 100 units, cap 8
    /// - Southbound: 60 units, cap 4
    /// - Pedestrians: 16 units, cap 5
    Capped,

    /// Smoke run: a handful of units with millisecond delays, capped waves
    Quick,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "capped" => Ok(Self::Capped),
            "quick" => Ok(Self::Quick),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: classic, capped, quick",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Capped => "capped",
            Self::Quick => "quick",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Classic
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("classic").unwrap(), Preset::Classic);
        assert_eq!(Preset::from_str("CAPPED").unwrap(), Preset::Capped);
        assert_eq!(Preset::from_str("quick").unwrap(), Preset::Quick);
        assert!(Preset::from_str("rush-hour").is_err());
    }

    #[test]
    fn test_preset_roundtrip() {
        for preset in [Preset::Classic, Preset::Capped, Preset::Quick] {
            assert_eq!(Preset::from_str(preset.as_str()).unwrap(), preset);
        }
    }
}
