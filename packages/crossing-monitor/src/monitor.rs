//! Admission monitor
//!
//! One `parking_lot::Mutex` guards the [`CrossingState`]; two condition
//! variables share it:
//! - `fairness`: units waiting for both rivals to have no queued units
//!   (and, when capped, for room in their own wave)
//! - `emptiness`: units waiting for the crossing to hold no rival occupants
//!
//! Waiters re-check their own predicate on every wake-up, so transitions that
//! may enable a different class always use `notify_all`.

use crate::class::TrafficClass;
use crate::errors::Result;
use crate::events::{CrossingEvent, CrossingObserver, EventKind, UnitId};
use crate::policy::AdmissionPolicy;
use crate::state::{CrossingSnapshot, CrossingState};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use tracing::{error, trace};

/// Exclusive, class-sensitive access to a single-lane crossing
///
/// # Example
///
/// ```
/// use crossing_monitor::{AdmissionMonitor, AdmissionPolicy, TrafficClass};
///
/// let monitor = AdmissionMonitor::new(AdmissionPolicy::unbounded());
/// monitor.request_entry(1, TrafficClass::Pedestrian);
/// assert_eq!(monitor.snapshot().inside, 1);
/// monitor.report_departure(TrafficClass::Pedestrian).unwrap();
/// assert!(monitor.snapshot().is_empty());
/// ```
pub struct AdmissionMonitor {
    policy: AdmissionPolicy,
    state: Mutex<CrossingState>,
    fairness: Condvar,
    emptiness: Condvar,
    observer: Option<Arc<dyn CrossingObserver>>,
}

impl AdmissionMonitor {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(CrossingState::new()),
            fairness: Condvar::new(),
            emptiness: Condvar::new(),
            observer: None,
        }
    }

    /// Create a monitor reporting every transition to `observer`
    pub fn with_observer(policy: AdmissionPolicy, observer: Arc<dyn CrossingObserver>) -> Self {
        Self {
            observer: Some(observer),
            ..Self::new(policy)
        }
    }

    pub fn policy(&self) -> &AdmissionPolicy {
        &self.policy
    }

    /// Block until `unit` of `class` is on the crossing
    ///
    /// # Protocol
    ///
    /// 1. Wait at the fairness gate: both rivals have no queued units and
    ///    (capped policy) the own wave has room.
    /// 2. Join the wave.
    /// 3. Wait at the emptiness gate: the crossing is empty or held by `class`.
    /// 4. Enter.
    ///
    /// Never times out; liveness comes from the gates themselves.
    pub fn request_entry(&self, unit: UnitId, class: TrafficClass) {
        let mut state = self.state.lock();
        self.emit(&mut state, Some(unit), class, EventKind::Arrived);
        state.blocked[class] += 1;
        state.at_fairness[class] += 1;

        while !state.fairness_gate_open(class, &self.policy) {
            trace!("{} {} waits at the fairness gate", class, unit);
            self.fairness.wait(&mut state);
        }
        state.at_fairness[class] -= 1;
        state.mark_queued(class, &self.policy);
        self.emit(&mut state, Some(unit), class, EventKind::Queued);

        while !state.emptiness_gate_open(class) {
            trace!("{} {} waits at the emptiness gate", class, unit);
            self.emptiness.wait(&mut state);
        }
        state.blocked[class] -= 1;
        state.enter(class, &self.policy);
        self.emit(&mut state, Some(unit), class, EventKind::Admitted);

        if let AdmissionPolicy::QueuedFlag = self.policy {
            // Flag for `class` just dropped; rivals parked on it may go.
            self.fairness.notify_all();
        }
        self.verify(&state);
    }

    /// Report that one unit of `class` left the crossing
    ///
    /// When the last occupant leaves, the crossing becomes free, the class's
    /// wave resets, and every waiter of both gates is woken.
    ///
    /// # Errors
    ///
    /// `ContractViolation` if `class` is not on the crossing. The state is
    /// left untouched; callers treat this as fatal.
    pub fn report_departure(&self, class: TrafficClass) -> Result<()> {
        let mut state = self.state.lock();
        let emptied = match state.leave(class, &self.policy) {
            Ok(emptied) => emptied,
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        };

        let remaining = state.inside;
        self.emit(&mut state, None, class, EventKind::Departed { remaining });
        if emptied {
            self.emit(&mut state, None, class, EventKind::Emptied);
            self.fairness.notify_all();
            self.emptiness.notify_all();
        }
        self.verify(&state);
        Ok(())
    }

    /// Enter and get a pass that reports departure when dropped
    pub fn enter(&self, unit: UnitId, class: TrafficClass) -> CrossingPass<'_> {
        self.request_entry(unit, class);
        CrossingPass {
            monitor: self,
            unit,
            class,
            active: true,
        }
    }

    pub fn snapshot(&self) -> CrossingSnapshot {
        self.state.lock().snapshot()
    }

    fn emit(
        &self,
        state: &mut CrossingState,
        unit: Option<UnitId>,
        class: TrafficClass,
        kind: EventKind,
    ) {
        let seq = state.tick();
        if let Some(observer) = &self.observer {
            observer.on_event(&CrossingEvent {
                seq,
                unit,
                class,
                kind,
                inside: state.inside,
            });
        }
    }

    fn verify(&self, state: &CrossingState) {
        if cfg!(debug_assertions) {
            if let Err(e) = state.check_invariants(&self.policy) {
                panic!("{}", e);
            }
        }
    }
}

impl std::fmt::Debug for AdmissionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionMonitor")
            .field("policy", &self.policy)
            .field("state", &self.snapshot())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

/// Proof of occupancy; reports departure on drop
#[must_use = "dropping the pass immediately leaves the crossing"]
pub struct CrossingPass<'a> {
    monitor: &'a AdmissionMonitor,
    unit: UnitId,
    class: TrafficClass,
    active: bool,
}

impl CrossingPass<'_> {
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn class(&self) -> TrafficClass {
        self.class
    }

    /// Leave now instead of on drop
    pub fn leave(mut self) -> Result<()> {
        self.active = false;
        self.monitor.report_departure(self.class)
    }
}

impl Drop for CrossingPass<'_> {
    fn drop(&mut self) {
        if self.active {
            let result = self.monitor.report_departure(self.class);
            debug_assert!(result.is_ok(), "pass departure failed: {:?}", result);
        }
    }
}
