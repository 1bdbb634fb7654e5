//! End-to-end simulation runs
//!
//! Each run spawns real threads; delays are scaled down to milliseconds.

mod common;

use common::*;
use crossing_sim::*;
use crossing_monitor::{TrafficClass, WaveCap};
use pretty_assertions::assert_eq;

#[test]
fn test_quick_run_crosses_everyone() {
    let config = quick_config(1);
    let report = Simulation::new(config.clone()).unwrap().run().unwrap();

    assert_all_crossed(&report, &config);
    assert_well_formed(&report, &config);
    assert_eq!(report.drivers.len(), 3);
    for driver in &report.drivers {
        assert_eq!(driver.spawned, driver.crossed);
    }
}

#[test]
fn test_capped_run_respects_caps() {
    let config = fast_capped_config(2024);
    let report = Simulation::new(config.clone()).unwrap().run().unwrap();

    assert_all_crossed(&report, &config);
    assert_well_formed(&report, &config);
    assert!(report.largest_wave[TrafficClass::Northbound] <= 8);
    assert!(report.largest_wave[TrafficClass::Southbound] <= 4);
    assert!(report.largest_wave[TrafficClass::Pedestrian] <= 5);
}

#[test]
fn test_classic_run_scaled_down() {
    let config = SimConfig::preset(Preset::Classic).seed(3).time_scale(0.002);
    let report = Simulation::new(config.clone()).unwrap().run().unwrap();

    assert_eq!(report.policy, "queued_flag");
    assert_all_crossed(&report, &config);
    assert_well_formed(&report, &config);
}

#[test]
fn test_single_class_never_switches() {
    let config = quick_config(4)
        .flow(TrafficClass::Southbound, |f| f.units(0))
        .flow(TrafficClass::Pedestrian, |f| f.units(0));
    let report = Simulation::new(config.clone()).unwrap().run().unwrap();

    assert_all_crossed(&report, &config);
    assert_eq!(report.direction_switches, 0);
    assert!(report
        .waves
        .iter()
        .all(|w| w.class == TrafficClass::Northbound));
}

#[test]
fn test_cap_one_serializes_units() {
    let config = quick_config(8)
        .flow(TrafficClass::Northbound, |f| f.wave_cap(WaveCap::limited(1).unwrap()))
        .flow(TrafficClass::Southbound, |f| f.wave_cap(WaveCap::limited(1).unwrap()));
    let report = Simulation::new(config.clone()).unwrap().run().unwrap();

    assert_all_crossed(&report, &config);
    assert!(report.waves.iter().all(|w| w.size == 1));
    assert_eq!(report.waves.len(), report.total_crossed());
}

#[test]
fn test_seed_is_reported_when_drawn() {
    let config = SimConfig::preset(Preset::Quick);
    assert_eq!(config.seed, None);
    let report = Simulation::new(config).unwrap().run().unwrap();

    // Same seed replays the same delays
    let replay = Simulation::new(SimConfig::preset(Preset::Quick).seed(report.seed))
        .unwrap()
        .run()
        .unwrap();
    for (a, b) in report.drivers.iter().zip(&replay.drivers) {
        assert_eq!(a.class, b.class);
        assert_eq!(a.occupancy, b.occupancy);
    }
}

#[test]
fn test_json_report_shape() {
    let report = Simulation::new(quick_config(6)).unwrap().run().unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["preset"], "quick");
    assert_eq!(json["seed"], 6);
    assert_eq!(json["max_concurrent_classes"], 1);
    assert!(json["waves"].as_array().unwrap().len() >= 3);
}
