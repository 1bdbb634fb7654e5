//! Error types for crossing-monitor
//!
//! The monitor itself performs no I/O, so every error here is a caller bug
//! or a broken invariant. None of them are retryable.

use crate::class::TrafficClass;
use thiserror::Error;

/// Main error type for admission monitor operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// Class index outside the ring
    #[error("Invalid traffic class index: {0} (expected 0..=2)")]
    InvalidClass(usize),

    /// Class name that does not parse
    #[error("Unknown traffic class '{0}'. Valid classes: northbound, southbound, pedestrian")]
    UnknownClass(String),

    /// Departure reported for a class that never entered
    #[error("Contract violation for {class}: {reason}")]
    ContractViolation { class: TrafficClass, reason: String },

    /// Crossing state failed its consistency check
    #[error("Crossing invariant violated: {0}")]
    InvariantViolated(String),
}

impl MonitorError {
    /// Create a contract violation
    pub fn contract(class: TrafficClass, reason: impl Into<String>) -> Self {
        MonitorError::ContractViolation {
            class,
            reason: reason.into(),
        }
    }

    /// Create an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        MonitorError::InvariantViolated(msg.into())
    }

    /// Contract and invariant violations are always fatal for the caller
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::ContractViolation { .. } | MonitorError::InvariantViolated(_)
        )
    }
}

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
