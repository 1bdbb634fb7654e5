/*
 * Crossing Monitor - Class-Exclusive Admission for a Single-Lane Crossing
 *
 * Three traffic classes (northbound, southbound, pedestrians) share one lane.
 * Only one class may be on the crossing at a time; members of that class
 * cross concurrently.
 *
 * Architecture:
 * - class/    : Traffic classes and their rival ring
 * - policy/   : Fairness gate variants (queued flag, capped waves)
 * - state/    : Crossing state + invariants
 * - monitor/  : Entry/exit protocol (Mutex + two Condvars)
 * - events/   : Ordered event stream (tracing narration, recording)
 *
 * Guarantees: mutual exclusion between classes, no deadlock, bounded
 * overtaking between classes.
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

pub mod class;
pub mod errors;
pub mod events;
pub mod monitor;
pub mod policy;
pub mod state;

// Re-exports
pub use class::{PerClass, TrafficClass};
pub use errors::{MonitorError, Result};
pub use events::{
    CrossingEvent, CrossingObserver, EventKind, EventRecorder, FanoutObserver, TracingObserver,
    UnitId, Wave,
};
pub use monitor::{AdmissionMonitor, CrossingPass};
pub use policy::{AdmissionPolicy, WaveCap};
pub use state::{CrossingSnapshot, CrossingState};
