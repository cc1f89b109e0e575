//! Observation window maintenance — eviction and append.
//!
//! The window is reconstructed each tick from the caller-persisted
//! annotation, advanced here, and handed back for persistence. New
//! samples are always appended last, so the stored order is
//! chronological and eviction can stop scanning at the first sample
//! that is still within the retention horizon.

use chrono::{DateTime, Utc};
use tracing::debug;

use prescale_model::{ObservationWindow, Sample};

/// Multiplier applied to the boot latency to size the retention horizon.
pub const RETENTION_FACTOR: f64 = 20.0;

/// Upper bound on the retention horizon. At a 30-second sampling
/// cadence this caps the window at roughly 20 samples.
pub const MAX_RETENTION_SECS: f64 = 600.0;

/// Maximum sample age kept in the window, derived from the current
/// boot-latency estimate. Recomputed every tick, never stored.
pub fn retention_horizon_secs(boot_latency_secs: f64) -> f64 {
    (boot_latency_secs * RETENTION_FACTOR).min(MAX_RETENTION_SECS)
}

/// Evict stale samples from `previous` and append the current
/// observation.
///
/// Precondition: `previous` is in chronological order (it always is
/// when reconstructed from this crate's own encoding). The scan evicts
/// every leading sample whose age is at or above the horizon and stops
/// at the first in-range sample; surviving samples keep their order and
/// the new sample lands last.
pub fn advance(
    previous: ObservationWindow,
    utilization: u32,
    now: DateTime<Utc>,
    boot_latency_secs: f64,
) -> ObservationWindow {
    let horizon = retention_horizon_secs(boot_latency_secs);

    let mut first_to_keep = previous.samples.len();
    for (i, sample) in previous.samples.iter().enumerate() {
        let age_secs = (now - sample.timestamp).num_milliseconds() as f64 / 1000.0;
        if age_secs < horizon {
            first_to_keep = i;
            break;
        }
    }

    if first_to_keep > 0 {
        debug!(
            evicted = first_to_keep,
            horizon_secs = horizon,
            "evicted stale utilization samples"
        );
    }

    let mut samples = previous.samples;
    samples.drain(..first_to_keep);
    samples.push(Sample {
        timestamp: now,
        utilization,
    });

    ObservationWindow { samples }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>, age_secs: i64, utilization: u32) -> Sample {
        Sample {
            timestamp: now - Duration::seconds(age_secs),
            utilization,
        }
    }

    #[test]
    fn horizon_is_twenty_times_boot_latency() {
        assert_eq!(retention_horizon_secs(5.0), 100.0);
        assert_eq!(retention_horizon_secs(0.0), 0.0);
    }

    #[test]
    fn horizon_caps_at_ten_minutes() {
        assert_eq!(retention_horizon_secs(60.0), 600.0);
        assert_eq!(retention_horizon_secs(1_000.0), 600.0);
    }

    #[test]
    fn empty_previous_yields_single_sample() {
        let now = Utc::now();
        let next = advance(ObservationWindow::default(), 70, now, 5.0);

        assert_eq!(next.len(), 1);
        assert_eq!(next.latest().unwrap().utilization, 70);
        assert_eq!(next.latest().unwrap().timestamp, now);
    }

    #[test]
    fn young_sample_survives() {
        let now = Utc::now();
        let previous = ObservationWindow {
            samples: vec![sample(now, 5, 50)],
        };

        let next = advance(previous, 70, now, 5.0);
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn stale_sample_is_evicted() {
        let now = Utc::now();
        // Horizon is min(5 * 20, 600) = 100s; an 11-minute-old sample
        // is well past it.
        let previous = ObservationWindow {
            samples: vec![sample(now, 11 * 60, 50)],
        };

        let next = advance(previous, 70, now, 5.0);
        assert_eq!(next.len(), 1);
        assert_eq!(next.latest().unwrap().utilization, 70);
    }

    #[test]
    fn partial_eviction_keeps_the_fresh_tail() {
        let now = Utc::now();
        let previous = ObservationWindow {
            samples: vec![sample(now, 11 * 60, 50), sample(now, 60, 10)],
        };

        let next = advance(previous, 70, now, 5.0);
        assert_eq!(next.len(), 2);
        assert_eq!(next.samples[0].utilization, 10);
        assert_eq!(next.samples[1].utilization, 70);
    }

    #[test]
    fn survivors_keep_their_order_and_newest_is_last() {
        let now = Utc::now();
        let previous = ObservationWindow {
            samples: vec![sample(now, 90, 30), sample(now, 60, 40), sample(now, 30, 50)],
        };

        let next = advance(previous, 70, now, 5.0);
        let utils: Vec<u32> = next.samples.iter().map(|s| s.utilization).collect();
        assert_eq!(utils, vec![30, 40, 50, 70]);
        assert_eq!(next.latest().unwrap().timestamp, now);
    }

    #[test]
    fn duplicate_timestamps_are_both_recorded() {
        let now = Utc::now();
        let previous = ObservationWindow {
            samples: vec![Sample {
                timestamp: now,
                utilization: 50,
            }],
        };

        let next = advance(previous, 70, now, 5.0);
        assert_eq!(next.len(), 2);
        assert_eq!(next.samples[0].utilization, 50);
        assert_eq!(next.samples[1].utilization, 70);
    }

    #[test]
    fn zero_boot_latency_evicts_everything_prior() {
        let now = Utc::now();
        let previous = ObservationWindow {
            samples: vec![sample(now, 1, 50)],
        };

        // Horizon is 0, so even a one-second-old sample is stale.
        let next = advance(previous, 70, now, 0.0);
        assert_eq!(next.len(), 1);
        assert_eq!(next.latest().unwrap().utilization, 70);
    }
}
