//! Custom assertions for crossing-monitor tests

use crossing_monitor::{AdmissionMonitor, AdmissionPolicy, EventRecorder, TrafficClass};

/// Crossing is empty and every entry was matched by a departure
pub fn assert_drained(monitor: &AdmissionMonitor) {
    let snap = monitor.snapshot();
    assert!(snap.is_empty(), "crossing not empty: {:?}", snap);
    assert_eq!(snap.inside, 0);
    assert_eq!(snap.total_blocked(), 0, "units still parked: {:?}", snap);
    for class in TrafficClass::ALL {
        assert_eq!(
            snap.entered[class], snap.departed[class],
            "{} entered {} but departed {}",
            class, snap.entered[class], snap.departed[class]
        );
    }
}

/// Replayed log never shows two classes on the crossing
pub fn assert_mutual_exclusion(recorder: &EventRecorder) {
    let peak = recorder.max_concurrent_classes();
    assert!(peak <= 1, "{} classes on the crossing at once", peak);
}

/// No wave grew beyond its class cap
pub fn assert_waves_within_caps(recorder: &EventRecorder, policy: &AdmissionPolicy) {
    for wave in recorder.waves() {
        if let Some(cap) = policy.wave_cap(wave.class).get() {
            assert!(
                wave.size <= cap as usize,
                "{} wave of {} exceeds cap {}",
                wave.class,
                wave.size,
                cap
            );
        }
    }
}

/// Departures never outnumber admissions at any point of the log
pub fn assert_conservation(recorder: &EventRecorder) {
    use crossing_monitor::{EventKind, PerClass};

    let mut balance = PerClass::splat(0i64);
    for event in recorder.events() {
        match event.kind {
            EventKind::Admitted => balance[event.class] += 1,
            EventKind::Departed { .. } => {
                balance[event.class] -= 1;
                assert!(
                    balance[event.class] >= 0,
                    "{} departed more than it entered at seq {}",
                    event.class,
                    event.seq
                );
            }
            _ => {}
        }
    }
}
