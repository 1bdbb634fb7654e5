//! Property-based tests for the admission monitor
//!
//! Invariants that should hold for ANY arrival pattern:
//! - Mutual exclusion: at most one class on the crossing
//! - Conservation: departures never exceed admissions
//! - Wave caps: no wave grows past its class cap
//! - Liveness: every arrival eventually crosses

mod common;

use common::*;
use crossing_monitor::*;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn class_strategy() -> impl Strategy<Value = TrafficClass> {
    (0usize..3).prop_map(|i| TrafficClass::from_index(i).unwrap())
}

fn cap_strategy() -> impl Strategy<Value = WaveCap> {
    prop_oneof![
        (1u32..5).prop_map(|n| WaveCap::limited(n).unwrap()),
        Just(WaveCap::Unlimited),
    ]
}

fn policy_strategy() -> impl Strategy<Value = AdmissionPolicy> {
    prop_oneof![
        Just(AdmissionPolicy::unbounded()),
        (cap_strategy(), cap_strategy(), cap_strategy())
            .prop_map(|(n, s, p)| AdmissionPolicy::capped(PerClass::new(n, s, p))),
    ]
}

/// (class, arrival delay in µs, hold time in µs)
fn arrivals_strategy() -> impl Strategy<Value = Vec<(TrafficClass, u64, u64)>> {
    prop::collection::vec((class_strategy(), 0u64..400, 0u64..300), 1..24)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_any_arrival_pattern_is_safe_and_live(
        policy in policy_strategy(),
        arrivals in arrivals_strategy(),
    ) {
        let (monitor, recorder) = observed_monitor(policy);

        let handles: Vec<_> = arrivals
            .iter()
            .enumerate()
            .map(|(unit, &(class, delay, hold))| {
                let monitor = Arc::clone(&monitor);
                thread::spawn(move || {
                    thread::sleep(Duration::from_micros(delay));
                    let _pass = monitor.enter(unit as u64, class);
                    thread::sleep(Duration::from_micros(hold));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_drained(&monitor);
        assert_mutual_exclusion(&recorder);
        assert_conservation(&recorder);
        assert_waves_within_caps(&recorder, &policy);

        let admitted = recorder.count(EventKind::Admitted);
        for class in TrafficClass::ALL {
            let expected = arrivals.iter().filter(|(c, _, _)| *c == class).count();
            prop_assert_eq!(admitted[class], expected);
        }
    }

    #[test]
    fn prop_sequential_same_class_never_blocks(
        class in class_strategy(),
        units in 1u64..32,
    ) {
        let monitor = AdmissionMonitor::new(AdmissionPolicy::unbounded());
        for unit in 0..units {
            monitor.request_entry(unit, class);
        }
        let snap = monitor.snapshot();
        prop_assert_eq!(snap.inside as u64, units);
        prop_assert_eq!(snap.occupying, Some(class));

        for _ in 0..units {
            monitor.report_departure(class).unwrap();
        }
        prop_assert!(monitor.snapshot().is_empty());
        prop_assert!(monitor.report_departure(class).is_err());
    }
}
