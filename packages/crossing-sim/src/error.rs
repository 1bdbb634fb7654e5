use crate::config::ConfigError;
use crossing_monitor::{MonitorError, TrafficClass, UnitId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Failed to spawn {class} unit {unit}: {source}")]
    Spawn {
        class: TrafficClass,
        unit: UnitId,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn {class} flow driver: {source}")]
    DriverSpawn {
        class: TrafficClass,
        #[source]
        source: std::io::Error,
    },

    #[error("{class} unit {unit} panicked while crossing")]
    UnitPanicked { class: TrafficClass, unit: UnitId },

    #[error("{class} flow driver panicked")]
    DriverPanicked { class: TrafficClass },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    pub fn serialization<E: std::fmt::Display>(e: E) -> Self {
        Self::Serialization(e.to_string())
    }

    /// Error category, for exit reporting
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::Config(_) | SimError::Serialization(_) => ErrorCategory::Input,
            SimError::Monitor(_) | SimError::UnitPanicked { .. } | SimError::DriverPanicked { .. } => {
                ErrorCategory::Contract
            }
            SimError::Spawn { .. } | SimError::DriverSpawn { .. } => {
                ErrorCategory::Resource
            }
        }
    }
}

/// Coarse error taxonomy. Nothing here is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCategory {
    /// Bad configuration or input file
    Input,
    /// Caller broke the monitor contract (fatal)
    Contract,
    /// Platform ran out of threads or similar
    Resource,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Contract => "contract",
            ErrorCategory::Resource => "resource",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
