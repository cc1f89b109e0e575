//! Least-squares trend fit over the observation window.
//!
//! Slope is `cov(t, u) / var(t)` (population statistics), which
//! minimizes squared vertical deviation from the fitted line over the
//! full retained window — smoothing noise at the cost of some lag.

use tracing::debug;

use prescale_model::{ObservationWindow, PredictError, PredictResult, Sample, TrendLine};

/// Fit a line to the window's (seconds-since-epoch, utilization) pairs.
///
/// Fails with [`PredictError::DegenerateInput`] when the time sequence
/// has zero population variance (fewer than two distinct timestamps),
/// so the slope division is never performed against zero.
pub fn fit(window: &ObservationWindow) -> PredictResult<TrendLine> {
    let seconds: Vec<f64> = window.samples.iter().map(Sample::epoch_seconds).collect();
    let utilization: Vec<f64> = window
        .samples
        .iter()
        .map(|s| f64::from(s.utilization))
        .collect();

    let time_variance = population_variance(&seconds);
    if time_variance == 0.0 {
        return Err(PredictError::DegenerateInput(format!(
            "{} samples with no time variance",
            window.len()
        )));
    }

    let slope = population_covariance(&seconds, &utilization) / time_variance;
    let intercept = mean(&utilization) - slope * mean(&seconds);

    debug!(
        slope,
        intercept,
        samples = window.len(),
        "fitted utilization trend"
    );

    Ok(TrendLine { intercept, slope })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}

fn population_covariance(xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return 0.0;
    }
    let mx = mean(xs);
    let my = mean(ys);
    xs.iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum::<f64>()
        / xs.len() as f64
}
