//! Custom assertions for crossing-sim tests

use crossing_sim::{SimConfig, SimulationReport};

/// Every configured unit crossed exactly once
pub fn assert_all_crossed(report: &SimulationReport, config: &SimConfig) {
    for (class, flow) in config.flows.iter() {
        assert_eq!(
            report.crossed[class], flow.units as usize,
            "{} crossed {} of {}",
            class, report.crossed[class], flow.units
        );
    }
    assert!(report.final_state.is_empty(), "{:?}", report.final_state);
}

/// Waves respect the configured caps and never share the crossing
pub fn assert_well_formed(report: &SimulationReport, config: &SimConfig) {
    assert!(
        report.max_concurrent_classes <= 1,
        "{} classes at once",
        report.max_concurrent_classes
    );
    let policy = config.admission_policy();
    for wave in &report.waves {
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
    let total: usize = report.waves.iter().map(|w| w.size).sum();
    assert_eq!(total, report.total_crossed());
}
