//! Domain types for the prescale core.
//!
//! These types are snapshots supplied by the caller each control-loop
//! tick: the observation window deserialized from the autoscaler's
//! annotations, and the instance list read from whatever runtime owns
//! the workload. All types are serializable to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for an instance of the scaled workload.
pub type InstanceId = String;

/// Seconds since the Unix epoch, with sub-second precision.
pub fn epoch_seconds(t: DateTime<Utc>) -> f64 {
    t.timestamp_micros() as f64 / 1_000_000.0
}

// ── Observation window ────────────────────────────────────────────

/// One utilization observation. Immutable once created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Wall-clock time the observation was taken.
    pub timestamp: DateTime<Utc>,
    /// Observed utilization percentage (non-negative; may exceed 100).
    pub utilization: u32,
}

impl Sample {
    /// The sample's time coordinate for regression.
    pub fn epoch_seconds(&self) -> f64 {
        epoch_seconds(self.timestamp)
    }
}

/// An ordered, time-bounded sequence of utilization samples.
///
/// Insertion order is chronological order: new samples are always
/// appended last, and eviction relies on that ordering. Samples are
/// stored positionally, so two observations taken at the same instant
/// are both kept rather than collapsing into one entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ObservationWindow {
    pub samples: Vec<Sample>,
}

impl ObservationWindow {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

// ── Workload instances ────────────────────────────────────────────

/// Lifecycle condition kinds reported for a workload instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// The instance has been placed but may still be starting.
    Scheduled,
    /// The instance finished starting up and is serviceable.
    Ready,
}

/// One lifecycle condition with the time it last changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InstanceCondition {
    pub kind: ConditionKind,
    pub last_transition: DateTime<Utc>,
}

/// Immutable snapshot of one running unit of the scaled workload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkloadInstance {
    pub id: InstanceId,
    /// When the instance was created.
    pub created_at: DateTime<Utc>,
    /// Lifecycle conditions reported by the runtime.
    pub conditions: Vec<InstanceCondition>,
    /// Opaque string metadata, including the boot-latency cache.
    pub annotations: HashMap<String, String>,
}

impl WorkloadInstance {
    /// The instance's ready condition, if it has reported one.
    pub fn ready_condition(&self) -> Option<&InstanceCondition> {
        self.conditions
            .iter()
            .find(|c| c.kind == ConditionKind::Ready)
    }
}

// ── Trend line ────────────────────────────────────────────────────

/// Utilization as an affine function of seconds since the Unix epoch.
///
/// Derived fresh each tick from the observation window; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendLine {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendLine {
    /// Project utilization to the moment a new instance would become
    /// ready: `now + boot_latency`.
    ///
    /// The result is unclamped and may be negative or exceed 100; the
    /// caller clamps before acting on it.
    pub fn predict(&self, now_secs: f64, boot_latency_secs: f64) -> f64 {
        self.intercept + self.slope * (now_secs + boot_latency_secs)
    }
}
