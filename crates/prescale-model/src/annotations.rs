//! The annotation contract between the prescale core and its caller.
//!
//! The caller stores three opaque string values: the serialized
//! observation window and the predictive-mode flag on the autoscaler
//! object, and a cached boot-latency duration string on each instance.
//! This module owns the wire formats; the core reads snapshots of the
//! annotation maps and returns [`AnnotationPatch`] writes instead of
//! mutating them in place.

use std::collections::HashMap;

use crate::error::{PredictError, PredictResult};
use crate::types::ObservationWindow;

/// Autoscaler annotation holding the serialized observation window.
pub const OBSERVATIONS_ANNOTATION: &str = "observedUtilizations";

/// Autoscaler annotation enabling predictive mode when set to `"true"`.
pub const PREDICTIVE_ANNOTATION: &str = "predictive";

/// Instance annotation caching the boot-latency duration string.
pub const BOOT_LATENCY_ANNOTATION: &str = "bootLatency";

/// A single key/value write the caller should apply to an object's
/// annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationPatch {
    pub key: &'static str,
    pub value: String,
}

/// Whether the autoscaler is operating in predictive mode.
///
/// Only the literal `"true"` enables it; anything else (or an absent
/// key) leaves the autoscaler in its non-predictive behavior.
pub fn is_predictive(annotations: &HashMap<String, String>) -> bool {
    annotations
        .get(PREDICTIVE_ANNOTATION)
        .is_some_and(|v| v == "true")
}

impl ObservationWindow {
    /// Parse a window from its annotation value: a JSON array of
    /// `{timestamp, utilization}` records with RFC 3339 timestamps.
    pub fn decode(raw: &str) -> PredictResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| PredictError::InputFormat(format!("observation window: {e}")))
    }

    /// Serialize the window for storage in the annotation.
    pub fn encode(&self) -> PredictResult<String> {
        serde_json::to_string(self)
            .map_err(|e| PredictError::InputFormat(format!("observation window: {e}")))
    }
}

/// Format a boot latency for the instance annotation cache.
pub fn format_duration_secs(secs: f64) -> String {
    format!("{secs}s")
}

/// Parse a cached duration string like `"90s"`, `"1.5s"`, or `"5m"`.
/// A bare number is taken as seconds.
pub fn parse_duration_secs(s: &str) -> PredictResult<f64> {
    let trimmed = s.trim();
    let (number, scale) = if let Some(n) = trimmed.strip_suffix('s') {
        (n, 1.0)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, 60.0)
    } else {
        (trimmed, 1.0)
    };

    number
        .parse::<f64>()
        .map(|v| v * scale)
        .map_err(|_| PredictError::DurationParse(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use chrono::DateTime;

    fn annotations(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn predictive_only_for_literal_true() {
        assert!(is_predictive(&annotations(&[(PREDICTIVE_ANNOTATION, "true")])));
        assert!(!is_predictive(&annotations(&[(PREDICTIVE_ANNOTATION, "True")])));
        assert!(!is_predictive(&annotations(&[(PREDICTIVE_ANNOTATION, "false")])));
        assert!(!is_predictive(&annotations(&[])));
    }

    #[test]
    fn window_round_trips_with_subsecond_timestamps() {
        let t0 = DateTime::from_timestamp(1_700_000_000, 500_000_000).unwrap();
        let t1 = DateTime::from_timestamp(1_700_000_030, 250_000_000).unwrap();
        let window = ObservationWindow {
            samples: vec![
                Sample {
                    timestamp: t0,
                    utilization: 50,
                },
                Sample {
                    timestamp: t1,
                    utilization: 70,
                },
            ],
        };

        let decoded = ObservationWindow::decode(&window.encode().unwrap()).unwrap();
        assert_eq!(decoded, window);
    }

    #[test]
    fn window_keeps_duplicate_timestamps() {
        let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let window = ObservationWindow {
            samples: vec![
                Sample {
                    timestamp: t,
                    utilization: 50,
                },
                Sample {
                    timestamp: t,
                    utilization: 70,
                },
            ],
        };

        let decoded = ObservationWindow::decode(&window.encode().unwrap()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.samples[1].utilization, 70);
    }

    #[test]
    fn malformed_window_is_input_format_error() {
        let err = ObservationWindow::decode("{not json").unwrap_err();
        assert!(matches!(err, PredictError::InputFormat(_)));

        let err = ObservationWindow::decode(r#"[{"timestamp":"yesterday","utilization":5}]"#)
            .unwrap_err();
        assert!(matches!(err, PredictError::InputFormat(_)));
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration_secs("30s").unwrap(), 30.0);
        assert_eq!(parse_duration_secs("1.5s").unwrap(), 1.5);
        assert_eq!(parse_duration_secs("5m").unwrap(), 300.0);
        assert_eq!(parse_duration_secs("45").unwrap(), 45.0);
        assert!(matches!(
            parse_duration_secs("fast").unwrap_err(),
            PredictError::DurationParse(_)
        ));
        assert!(matches!(
            parse_duration_secs("").unwrap_err(),
            PredictError::DurationParse(_)
        ));
    }

    #[test]
    fn duration_format_round_trips() {
        for secs in [0.0, 90.0, 59.123, 3600.5] {
            let parsed = parse_duration_secs(&format_duration_secs(secs)).unwrap();
            assert_eq!(parsed, secs);
        }
    }
}
