//! Boot-latency estimation — how long instances take to become ready.
//!
//! The per-instance latency is cached as a duration string in the
//! instance's annotations the first time it is computed. The cached
//! value is authoritative from then on: recomputing later could drift
//! as the observed ready transition moves relative to a skewed clock.
//! This core never writes the cache itself; it returns the write as an
//! [`AnnotationPatch`] for the caller to persist.

use tracing::warn;

use prescale_model::{
    AnnotationPatch, BOOT_LATENCY_ANNOTATION, InstanceId, PredictError, PredictResult,
    WorkloadInstance, format_duration_secs, parse_duration_secs,
};

/// Boot latency for a single instance, with the write-once cache state
/// made explicit: `cache_write` is `Some` exactly when the value was
/// computed fresh and the caller must persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBootLatency {
    pub seconds: f64,
    pub cache_write: Option<AnnotationPatch>,
}

/// Averaged boot latency across a set of instances, plus the cache
/// writes accumulated along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct BootLatencyEstimate {
    pub seconds: f64,
    pub cache_writes: Vec<(InstanceId, AnnotationPatch)>,
}

/// Boot latency of one instance: the time from creation to its ready
/// condition's transition.
///
/// Fails with [`PredictError::NotReady`] when the instance has no ready
/// condition, and with [`PredictError::DurationParse`] when a cached
/// value is malformed.
pub fn instance_boot_latency(instance: &WorkloadInstance) -> PredictResult<InstanceBootLatency> {
    let ready = instance
        .ready_condition()
        .ok_or_else(|| PredictError::NotReady(instance.id.clone()))?;

    if let Some(cached) = instance.annotations.get(BOOT_LATENCY_ANNOTATION) {
        let seconds = parse_duration_secs(cached)?;
        return Ok(InstanceBootLatency {
            seconds,
            cache_write: None,
        });
    }

    // A skewed clock can report a ready transition before the creation
    // timestamp; a negative latency must never reach the retention
    // horizon, so it clamps to zero.
    let seconds =
        ((ready.last_transition - instance.created_at).num_milliseconds() as f64 / 1000.0).max(0.0);
    Ok(InstanceBootLatency {
        seconds,
        cache_write: Some(AnnotationPatch {
            key: BOOT_LATENCY_ANNOTATION,
            value: format_duration_secs(seconds),
        }),
    })
}

/// Arithmetic mean of the boot latencies of the instances that have a
/// ready condition.
///
/// Instances without one are skipped; with zero contributing instances
/// the estimate is `0.0` and no error. A malformed cache annotation
/// still fails the whole call: corrupt persisted state should surface
/// rather than silently shrink the denominator.
pub fn average_boot_latency(instances: &[WorkloadInstance]) -> PredictResult<BootLatencyEstimate> {
    let mut total_secs = 0.0;
    let mut contributing = 0usize;
    let mut cache_writes = Vec::new();

    for instance in instances {
        match instance_boot_latency(instance) {
            Ok(latency) => {
                total_secs += latency.seconds;
                contributing += 1;
                if let Some(patch) = latency.cache_write {
                    cache_writes.push((instance.id.clone(), patch));
                }
            }
            Err(PredictError::NotReady(id)) => {
                warn!(instance = %id, "skipping instance without a ready condition");
            }
            Err(e) => return Err(e),
        }
    }

    let seconds = if contributing == 0 {
        0.0
    } else {
        total_secs / contributing as f64
    };

    Ok(BootLatencyEstimate {
        seconds,
        cache_writes,
    })
}
