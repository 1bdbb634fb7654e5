//! Monitor fixtures

use crossing_monitor::{AdmissionMonitor, AdmissionPolicy, CrossingSnapshot, EventRecorder};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Monitor wired to a fresh event recorder
pub fn observed_monitor(policy: AdmissionPolicy) -> (Arc<AdmissionMonitor>, Arc<EventRecorder>) {
    let recorder = Arc::new(EventRecorder::new());
    let monitor = Arc::new(AdmissionMonitor::with_observer(policy, recorder.clone()));
    (monitor, recorder)
}

/// Poll the monitor until `pred` holds (5s budget)
pub fn wait_for(monitor: &AdmissionMonitor, pred: impl Fn(&CrossingSnapshot) -> bool) {
    for _ in 0..5000 {
        if pred(&monitor.snapshot()) {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("condition never reached: {:?}", monitor.snapshot());
}
