//! Per-tick orchestration — snapshot in, prediction and patches out.
//!
//! One call per autoscaled entity per reconciliation tick. The caller
//! supplies immutable snapshots (the autoscaler's annotation map and
//! the current instance list); the core returns the annotation writes
//! to persist plus, once the window holds enough history, the
//! predicted utilization. Any error leaves the persisted state
//! untouched — the caller decides whether to fall back to
//! non-predictive behavior for this tick.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use prescale_model::{
    AnnotationPatch, InstanceId, OBSERVATIONS_ANNOTATION, ObservationWindow, PredictError,
    PredictResult, WorkloadInstance, epoch_seconds, is_predictive,
};

use crate::boot::average_boot_latency;
use crate::trend::fit;
use crate::window::advance;

/// Everything the caller needs from one predictive tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Projected utilization at `now + boot latency`. `None` while the
    /// window is still degenerate (fewer than two distinct sample
    /// timestamps); unclamped otherwise — the caller clamps before
    /// acting on it.
    pub predicted_utilization: Option<f64>,
    /// The advanced window, also serialized into `window_patch`.
    pub window: ObservationWindow,
    /// Write to apply to the autoscaler's annotations.
    pub window_patch: AnnotationPatch,
    /// Boot-latency cache writes to apply to individual instances.
    pub instance_patches: Vec<(InstanceId, AnnotationPatch)>,
}

/// Run one predictive tick.
///
/// Returns `Ok(None)` when predictive mode is not enabled on the
/// entity. A missing window annotation is treated as an empty window;
/// a malformed one is an `InputFormat` error.
///
/// The advanced window is always returned for persistence, even when
/// the trend fit is still degenerate: the window has to survive the
/// early ticks for predictive mode to bootstrap at all. The fit runs
/// on the advanced window, so the prediction appears as soon as two
/// distinct sample timestamps have accumulated.
pub fn evaluate_tick(
    annotations: &HashMap<String, String>,
    instances: &[WorkloadInstance],
    current_utilization: u32,
    now: DateTime<Utc>,
) -> PredictResult<Option<TickOutcome>> {
    if !is_predictive(annotations) {
        return Ok(None);
    }

    let previous = match annotations.get(OBSERVATIONS_ANNOTATION) {
        Some(raw) => ObservationWindow::decode(raw)?,
        None => ObservationWindow::default(),
    };

    let boot = average_boot_latency(instances)?;
    let window = advance(previous, current_utilization, now, boot.seconds);

    let predicted_utilization = match fit(&window) {
        Ok(trend) => Some(trend.predict(epoch_seconds(now), boot.seconds)),
        Err(PredictError::DegenerateInput(reason)) => {
            debug!(reason, "window not yet fittable, persisting samples only");
            None
        }
        Err(e) => return Err(e),
    };

    let window_patch = AnnotationPatch {
        key: OBSERVATIONS_ANNOTATION,
        value: window.encode()?,
    };

    debug!(
        predicted_utilization,
        boot_latency_secs = boot.seconds,
        samples = window.len(),
        "evaluated predictive tick"
    );

    Ok(Some(TickOutcome {
        predicted_utilization,
        window,
        window_patch,
        instance_patches: boot.cache_writes,
    }))
}
