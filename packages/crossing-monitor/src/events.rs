//! Crossing events and observers
//!
//! The monitor reports every state transition to a [`CrossingObserver`] while
//! still holding its lock, so the event stream has the same total order as
//! the transitions themselves. `seq` is the monitor's operation counter.

use crate::class::{PerClass, TrafficClass};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Caller-chosen identifier of one crossing unit
pub type UnitId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Unit called `request_entry`
    Arrived,
    /// Unit passed the fairness gate and joined the wave
    Queued,
    /// Unit passed the emptiness gate and is on the crossing
    Admitted,
    /// A unit of the class reported departure
    Departed { remaining: u32 },
    /// Last occupant left; direction may switch
    Emptied,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Arrived => "arrived",
            EventKind::Queued => "queued",
            EventKind::Admitted => "admitted",
            EventKind::Departed { .. } => "departed",
            EventKind::Emptied => "emptied",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingEvent {
    pub seq: u64,
    /// `None` for departures and emptied events; departures carry only the class
    pub unit: Option<UnitId>,
    pub class: TrafficClass,
    pub kind: EventKind,
    /// Units on the crossing after the transition
    pub inside: u32,
}

/// Receives crossing events in lock order
pub trait CrossingObserver: Send + Sync {
    fn on_event(&self, event: &CrossingEvent);
}

/// Narrates the crossing through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CrossingObserver for TracingObserver {
    fn on_event(&self, event: &CrossingEvent) {
        let unit = event.unit.unwrap_or_default();
        match event.kind {
            EventKind::Arrived => info!(
                seq = event.seq,
                "{} {} wants to enter (inside: {})",
                event.class, unit, event.inside
            ),
            EventKind::Queued => debug!(
                seq = event.seq,
                "{} {} passed the fairness gate",
                event.class, unit
            ),
            EventKind::Admitted => info!(
                seq = event.seq,
                "{} {} enters the crossing (inside: {})",
                event.class, unit, event.inside
            ),
            EventKind::Departed { remaining } => info!(
                seq = event.seq,
                "{} unit left the crossing ({} remaining)",
                event.class, remaining
            ),
            EventKind::Emptied => info!(
                seq = event.seq,
                "Crossing empty after {} wave, direction may change",
                event.class
            ),
        }
    }
}

/// Forwards each event to several observers in order
#[derive(Default, Clone)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn CrossingObserver>>,
}

impl FanoutObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn CrossingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl CrossingObserver for FanoutObserver {
    fn on_event(&self, event: &CrossingEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// One uninterrupted occupation of the crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    pub class: TrafficClass,
    pub size: usize,
}

/// Records the event stream for later analysis
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Mutex<Vec<CrossingEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CrossingEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Admitted units in admission order
    pub fn admissions(&self) -> Vec<(TrafficClass, UnitId)> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == EventKind::Admitted)
            .filter_map(|e| e.unit.map(|u| (e.class, u)))
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> PerClass<usize> {
        let mut counts = PerClass::splat(0usize);
        for event in self.events.lock().iter() {
            if std::mem::discriminant(&event.kind) == std::mem::discriminant(&kind) {
                counts[event.class] += 1;
            }
        }
        counts
    }

    /// Waves in order. A trailing wave still on the crossing is included.
    pub fn waves(&self) -> Vec<Wave> {
        let mut waves = Vec::new();
        let mut current: Option<Wave> = None;
        for event in self.events.lock().iter() {
            match event.kind {
                EventKind::Admitted => match current.as_mut() {
                    Some(wave) => wave.size += 1,
                    None => {
                        current = Some(Wave {
                            class: event.class,
                            size: 1,
                        })
                    }
                },
                EventKind::Emptied => waves.extend(current.take()),
                _ => {}
            }
        }
        waves.extend(current);
        waves
    }

    /// Consecutive waves of different classes
    pub fn direction_switches(&self) -> usize {
        self.waves()
            .windows(2)
            .filter(|pair| pair[0].class != pair[1].class)
            .count()
    }

    /// Peak number of classes simultaneously on the crossing, replayed from the log
    pub fn max_concurrent_classes(&self) -> usize {
        let mut inside = PerClass::splat(0i64);
        let mut peak = 0;
        for event in self.events.lock().iter() {
            match event.kind {
                EventKind::Admitted => inside[event.class] += 1,
                EventKind::Departed { .. } => inside[event.class] -= 1,
                _ => continue,
            }
            let occupied = inside.iter().filter(|(_, n)| **n != 0).count();
            peak = peak.max(occupied);
        }
        peak
    }
}

impl CrossingObserver for EventRecorder {
    fn on_event(&self, event: &CrossingEvent) {
        self.events.lock().push(*event);
    }
}
