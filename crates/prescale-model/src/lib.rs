//! prescale-model — domain model for the prescale predictive core.
//!
//! Defines the utilization sample window, workload instance snapshots,
//! the fitted trend line, and the annotation contract through which the
//! core exchanges opaque string metadata with its caller.
//!
//! # Architecture
//!
//! All persistence is the caller's responsibility. The core reads an
//! immutable snapshot (annotation map + instance list), computes, and
//! hands back values plus `AnnotationPatch` writes for the caller to
//! apply. Nothing in this crate mutates caller-owned state.
//!
//! The observation window is an explicit positional sequence of
//! `{timestamp, utilization}` records, JSON-serialized with RFC 3339
//! timestamps so sub-second precision survives the round trip.

pub mod annotations;
pub mod error;
pub mod types;

pub use annotations::{
    AnnotationPatch, BOOT_LATENCY_ANNOTATION, OBSERVATIONS_ANNOTATION, PREDICTIVE_ANNOTATION,
    format_duration_secs, is_predictive, parse_duration_secs,
};
pub use error::{PredictError, PredictResult};
pub use types::*;
