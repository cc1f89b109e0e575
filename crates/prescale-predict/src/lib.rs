//! prescale-predict — trend-based utilization projection.
//!
//! Given a rolling window of CPU utilization samples for a scaled
//! workload, fits a linear trend and projects it forward by the
//! workload's typical boot latency, so the caller can scale up before a
//! new instance would otherwise be needed.
//!
//! # Per-tick algorithm
//!
//! ```text
//! boot_latency = mean(ready_transition - created_at) over ready instances
//! horizon      = min(boot_latency * 20, 600s)
//!
//! window  = evict samples older than horizon, append (now, utilization)
//! slope   = population_cov(seconds, utilization) / population_var(seconds)
//! predict = intercept + slope * (now + boot_latency)
//! ```
//!
//! Every operation is a synchronous pure transformation over
//! caller-supplied snapshots: no shared state, no I/O, no background
//! tasks. Concurrent ticks for the *same* entity must be serialized by
//! the caller; different entities share nothing.

pub mod boot;
pub mod bridge;
pub mod trend;
pub mod window;

pub use boot::{BootLatencyEstimate, InstanceBootLatency, average_boot_latency, instance_boot_latency};
pub use bridge::{TickOutcome, evaluate_tick};
pub use trend::fit;
pub use window::{advance, retention_horizon_secs};
