//! Flow drivers
//!
//! A driver generates one class's arrival stream: it spawns one thread per
//! unit, sleeping an exponential gap between spawns, and joins them all at
//! the end. Each unit enters through the monitor, occupies the crossing for
//! its sampled duration, and leaves.

use crate::config::FlowConfig;
use crate::delay::DelaySampler;
use crate::error::{Result, SimError};
use crossing_monitor::{AdmissionMonitor, TrafficClass, UnitId};
use serde::Serialize;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What one unit thread does once spawned
pub type UnitBody =
    fn(&AdmissionMonitor, UnitId, TrafficClass, Duration) -> crossing_monitor::Result<()>;

/// Outcome of one completed flow
#[derive(Debug, Clone, Serialize)]
pub struct DriverReport {
    pub class: TrafficClass,
    pub spawned: u32,
    pub crossed: u32,
    /// Sum of sampled occupancy durations
    pub occupancy: Duration,
    pub elapsed: Duration,
}

pub struct FlowDriver {
    class: TrafficClass,
    flow: FlowConfig,
    monitor: Arc<AdmissionMonitor>,
    sampler: DelaySampler,
    body: UnitBody,
}

impl FlowDriver {
    pub fn new(
        class: TrafficClass,
        flow: FlowConfig,
        monitor: Arc<AdmissionMonitor>,
        sampler: DelaySampler,
    ) -> Self {
        Self {
            class,
            flow,
            monitor,
            sampler,
            body: cross,
        }
    }

    #[cfg(test)]
    fn with_body(mut self, body: UnitBody) -> Self {
        self.body = body;
        self
    }

    /// Run the driver on its own thread named `{class}-driver`
    pub fn spawn(self) -> Result<JoinHandle<Result<DriverReport>>> {
        let class = self.class;
        thread::Builder::new()
            .name(format!("{}-driver", class))
            .spawn(move || self.run())
            .map_err(|source| SimError::DriverSpawn { class, source })
    }

    /// Spawn every unit, then wait for all of them
    ///
    /// # Errors
    ///
    /// - `Spawn` if a unit thread could not be created. No further units
    ///   arrive, but the ones already spawned are still joined.
    /// - `UnitPanicked` if a unit panicked.
    /// - `Monitor` if a unit broke the departure contract.
    pub fn run(mut self) -> Result<DriverReport> {
        let start = Instant::now();
        let class = self.class;
        let mut units: Vec<(UnitId, JoinHandle<crossing_monitor::Result<()>>)> =
            Vec::with_capacity(self.flow.units as usize);
        let mut occupancy = Duration::ZERO;
        let mut spawn_error = None;

        info!("{} flow starts: {} units", class, self.flow.units);

        for unit in 0..UnitId::from(self.flow.units) {
            if unit > 0 {
                thread::sleep(self.sampler.next_interarrival());
            }

            let duration = self.sampler.next_crossing();
            let monitor = Arc::clone(&self.monitor);
            let body = self.body;
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", class, unit))
                .spawn(move || body(&monitor, unit, class, duration));

            match spawned {
                Ok(handle) => {
                    occupancy += duration;
                    units.push((unit, handle));
                }
                Err(source) => {
                    warn!("{} flow stops after {} units: {}", class, unit, source);
                    spawn_error = Some(SimError::Spawn {
                        class,
                        unit,
                        source,
                    });
                    break;
                }
            }
        }

        let spawned = units.len() as u32;
        let mut crossed = 0u32;
        let mut first_error = spawn_error;

        for (unit, handle) in units {
            let outcome = match handle.join() {
                Ok(Ok(())) => {
                    crossed += 1;
                    continue;
                }
                Ok(Err(e)) => SimError::Monitor(e),
                Err(_) => SimError::UnitPanicked { class, unit },
            };
            warn!("{}", outcome);
            first_error.get_or_insert(outcome);
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let report = DriverReport {
            class,
            spawned,
            crossed,
            occupancy,
            elapsed: start.elapsed(),
        };
        info!(
            "{} flow done: {} crossed in {:.2?}",
            class, report.crossed, report.elapsed
        );
        Ok(report)
    }
}

fn cross(
    monitor: &AdmissionMonitor,
    unit: UnitId,
    class: TrafficClass,
    duration: Duration,
) -> crossing_monitor::Result<()> {
    let pass = monitor.enter(unit, class);
    debug!("{} {} on the crossing for {:.2?}", class, unit, duration);
    thread::sleep(duration);
    pass.leave()
}
