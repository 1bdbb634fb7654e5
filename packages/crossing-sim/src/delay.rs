//! Random delays for one flow
//!
//! Inter-arrival gaps are exponential, occupancy durations normal. Every
//! class gets its own `StdRng` stream derived from the run seed, so a seeded
//! run produces the same delays regardless of thread scheduling.

use crate::config::{ConfigError, ConfigResult, FlowConfig};
use crossing_monitor::TrafficClass;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};
use std::time::Duration;

const STREAM_SPREAD: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed of one class's stream
pub fn stream_seed(seed: u64, class: TrafficClass) -> u64 {
    seed ^ STREAM_SPREAD.wrapping_mul(class.index() as u64 + 1)
}

#[derive(Debug, Clone)]
pub struct DelaySampler {
    rng: StdRng,
    /// `None` when the mean gap is zero
    interarrival: Option<Exp<f64>>,
    crossing: Normal<f64>,
    time_scale: f64,
}

impl DelaySampler {
    pub fn new(flow: &FlowConfig, seed: u64, time_scale: f64) -> ConfigResult<Self> {
        let interarrival = if flow.mean_interarrival_ms > 0.0 {
            let exp = Exp::new(1.0 / flow.mean_interarrival_ms).map_err(|e| {
                ConfigError::range_with_hint(
                    "mean_interarrival_ms",
                    flow.mean_interarrival_ms,
                    0,
                    f64::MAX,
                    e.to_string(),
                )
            })?;
            Some(exp)
        } else {
            None
        };

        let crossing = Normal::new(flow.crossing_mean_ms, flow.crossing_stddev_ms).map_err(|e| {
            ConfigError::range_with_hint(
                "crossing_stddev_ms",
                flow.crossing_stddev_ms,
                0,
                f64::MAX,
                e.to_string(),
            )
        })?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            interarrival,
            crossing,
            time_scale,
        })
    }

    /// Gap before the next unit arrives
    pub fn next_interarrival(&mut self) -> Duration {
        match &self.interarrival {
            Some(exp) => {
                let ms = exp.sample(&mut self.rng);
                self.scaled(ms)
            }
            None => Duration::ZERO,
        }
    }

    /// How long the next unit stays on the crossing
    pub fn next_crossing(&mut self) -> Duration {
        let ms = self.crossing.sample(&mut self.rng);
        self.scaled(ms)
    }

    // Negative normal samples clamp to zero.
    fn scaled(&self, ms: f64) -> Duration {
        let ms = ms * self.time_scale;
        if ms.is_finite() && ms > 0.0 {
            Duration::from_secs_f64(ms / 1000.0)
        } else {
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    fn classic_pedestrians() -> FlowConfig {
        FlowConfig::from_preset(Preset::Classic, TrafficClass::Pedestrian)
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = DelaySampler::new(&classic_pedestrians(), 42, 1.0).unwrap();
        let mut b = DelaySampler::new(&classic_pedestrians(), 42, 1.0).unwrap();
        for _ in 0..20 {
            assert_eq!(a.next_interarrival(), b.next_interarrival());
            assert_eq!(a.next_crossing(), b.next_crossing());
        }
    }

    #[test]
    fn test_class_streams_differ() {
        let seeds: Vec<_> = TrafficClass::ALL.iter().map(|&c| stream_seed(7, c)).collect();
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(seeds[1], seeds[2]);
        assert_ne!(seeds[0], seeds[2]);
    }

    #[test]
    fn test_negative_samples_clamp_to_zero() {
        // Mean zero: about half the samples are negative
        let flow = classic_pedestrians().crossing_ms(0.0, 1.0);
        let mut sampler = DelaySampler::new(&flow, 1, 1.0).unwrap();
        let zeros = (0..200).filter(|_| sampler.next_crossing().is_zero()).count();
        assert!(zeros > 50, "only {} clamped samples", zeros);
    }

    #[test]
    fn test_zero_mean_gap_is_immediate() {
        let flow = classic_pedestrians().mean_interarrival_ms(0.0);
        let mut sampler = DelaySampler::new(&flow, 1, 1.0).unwrap();
        assert_eq!(sampler.next_interarrival(), Duration::ZERO);
    }

    #[test]
    fn test_time_scale_shrinks_delays() {
        let flow = classic_pedestrians().crossing_ms(1000.0, 0.0);
        let mut full = DelaySampler::new(&flow, 3, 1.0).unwrap();
        let mut fast = DelaySampler::new(&flow, 3, 0.01).unwrap();
        assert_eq!(full.next_crossing(), Duration::from_secs(1));
        assert_eq!(fast.next_crossing(), Duration::from_millis(10));
    }
}
