//! Crossing state shared by every unit
//!
//! Lives inside the monitor's mutex and is only mutated by
//! [`AdmissionMonitor`](crate::monitor::AdmissionMonitor) while the lock is held.
//!
//! State machine: `EMPTY -> OCCUPIED_BY(d) -> EMPTY`.

use crate::class::{PerClass, TrafficClass};
use crate::errors::{MonitorError, Result};
use crate::policy::AdmissionPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default)]
pub struct CrossingState {
    /// Class holding the crossing, `None` when empty
    pub(crate) occupying: Option<TrafficClass>,
    /// Units currently on the crossing
    pub(crate) inside: u32,
    /// Wave members admitted past the fairness gate.
    /// Counter for `WaveCapped`, 0/1 flag for `QueuedFlag`.
    pub(crate) wave: PerClass<u32>,
    /// Units currently parked inside `request_entry`
    pub(crate) blocked: PerClass<u32>,
    /// Subset of `blocked` still in front of the fairness gate
    pub(crate) at_fairness: PerClass<u32>,
    /// Class of the last wave that emptied the crossing
    pub(crate) last_wave: Option<TrafficClass>,
    pub(crate) entered: PerClass<u64>,
    pub(crate) departed: PerClass<u64>,
    /// Number of emptied occupations so far
    pub(crate) occupations: u64,
    /// Monotonic operation counter, stamped on events as `seq`
    pub(crate) operations: u64,
}

impl CrossingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step 2 of `request_entry`: no rival has queued units and (bounded
    /// variant) the own wave still has room.
    ///
    /// Bounded variant only: a class whose wave just emptied the crossing
    /// yields while a rival is waiting at this gate.
    pub fn fairness_gate_open(&self, class: TrafficClass, policy: &AdmissionPolicy) -> bool {
        let [left, right] = class.rivals();
        if self.wave[left] != 0 || self.wave[right] != 0 {
            return false;
        }
        match policy {
            AdmissionPolicy::QueuedFlag => true,
            AdmissionPolicy::WaveCapped(caps) => {
                caps[class].admits(self.wave[class]) && !self.must_hand_off(class)
            }
        }
    }

    fn must_hand_off(&self, class: TrafficClass) -> bool {
        let [left, right] = class.rivals();
        self.occupying.is_none()
            && self.last_wave == Some(class)
            && (self.at_fairness[left] > 0 || self.at_fairness[right] > 0)
    }

    /// Step 4 of `request_entry`: nobody of a rival class is on the crossing
    pub fn emptiness_gate_open(&self, class: TrafficClass) -> bool {
        match self.occupying {
            None => true,
            Some(current) => current == class,
        }
    }

    pub(crate) fn mark_queued(&mut self, class: TrafficClass, policy: &AdmissionPolicy) {
        match policy {
            AdmissionPolicy::QueuedFlag => self.wave[class] = 1,
            AdmissionPolicy::WaveCapped(_) => self.wave[class] += 1,
        }
    }

    pub(crate) fn enter(&mut self, class: TrafficClass, policy: &AdmissionPolicy) {
        self.occupying = Some(class);
        self.inside += 1;
        self.entered[class] += 1;
        if let AdmissionPolicy::QueuedFlag = policy {
            // The flag only has to hold newcomers back until someone is inside.
            self.wave[class] = 0;
        }
    }

    /// Step 2-3 of `report_departure`. Returns `true` when the crossing emptied.
    pub(crate) fn leave(&mut self, class: TrafficClass, policy: &AdmissionPolicy) -> Result<bool> {
        match self.occupying {
            None => {
                return Err(MonitorError::contract(
                    class,
                    "departure reported while the crossing is empty",
                ))
            }
            Some(current) if current != class => {
                return Err(MonitorError::contract(
                    class,
                    format!("departure reported while {} holds the crossing", current),
                ))
            }
            Some(_) => {}
        }

        self.inside -= 1;
        self.departed[class] += 1;
        if self.inside > 0 {
            return Ok(false);
        }

        self.occupying = None;
        self.last_wave = Some(class);
        self.occupations += 1;
        if policy.is_counted() {
            self.wave[class] = 0;
        }
        Ok(true)
    }

    pub(crate) fn tick(&mut self) -> u64 {
        self.operations += 1;
        self.operations
    }

    /// Check the crossing invariants
    pub fn check_invariants(&self, policy: &AdmissionPolicy) -> Result<()> {
        match self.occupying {
            None if self.inside != 0 => {
                return Err(MonitorError::invariant(format!(
                    "crossing empty but {} units inside",
                    self.inside
                )))
            }
            Some(class) if self.inside == 0 => {
                return Err(MonitorError::invariant(format!(
                    "{} occupies the crossing with nobody inside",
                    class
                )))
            }
            _ => {}
        }

        for class in TrafficClass::ALL {
            if self.departed[class] > self.entered[class] {
                return Err(MonitorError::invariant(format!(
                    "{} departed {} times but entered {}",
                    class, self.departed[class], self.entered[class]
                )));
            }
            let on_bridge = self.entered[class] - self.departed[class];
            if on_bridge > 0 && self.occupying != Some(class) {
                return Err(MonitorError::invariant(format!(
                    "{} has {} units inside while {:?} occupies",
                    class, on_bridge, self.occupying
                )));
            }
            if let Some(cap) = policy.wave_cap(class).get() {
                if self.wave[class] > cap {
                    return Err(MonitorError::invariant(format!(
                        "{} wave of {} exceeds cap {}",
                        class, self.wave[class], cap
                    )));
                }
            }
        }

        let total: u64 = TrafficClass::ALL
            .iter()
            .map(|&c| self.entered[c] - self.departed[c])
            .sum();
        if total != u64::from(self.inside) {
            return Err(MonitorError::invariant(format!(
                "inside count {} disagrees with per-class balance {}",
                self.inside, total
            )));
        }
        Ok(())
    }

    pub fn snapshot(&self) -> CrossingSnapshot {
        CrossingSnapshot {
            occupying: self.occupying,
            inside: self.inside,
            wave: self.wave,
            blocked: self.blocked,
            at_fairness: self.at_fairness,
            last_wave: self.last_wave,
            entered: self.entered,
            departed: self.departed,
            occupations: self.occupations,
            operations: self.operations,
        }
    }
}

/// Point-in-time copy of the crossing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingSnapshot {
    pub occupying: Option<TrafficClass>,
    pub inside: u32,
    pub wave: PerClass<u32>,
    pub blocked: PerClass<u32>,
    pub at_fairness: PerClass<u32>,
    pub last_wave: Option<TrafficClass>,
    pub entered: PerClass<u64>,
    pub departed: PerClass<u64>,
    pub occupations: u64,
    pub operations: u64,
}

impl CrossingSnapshot {
    pub fn is_empty(&self) -> bool {
        self.occupying.is_none()
    }

    pub fn total_blocked(&self) -> u32 {
        self.blocked.iter().map(|(_, n)| *n).sum()
    }
}
