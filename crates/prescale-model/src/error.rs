//! Error types for the prescale core.

use thiserror::Error;

use crate::types::InstanceId;

/// Result type alias for prescale operations.
pub type PredictResult<T> = Result<T, PredictError>;

/// Errors that can occur while computing a prediction.
///
/// Every error is returned to the caller, who decides whether to skip
/// prediction for the tick or propagate. No operation retries internally.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Externally stored window data failed to parse.
    #[error("malformed input: {0}")]
    InputFormat(String),

    /// Boot latency was requested for an instance with no ready condition.
    #[error("instance {0} is not ready")]
    NotReady(InstanceId),

    /// The regression input has zero time variance.
    #[error("degenerate regression input: {0}")]
    DegenerateInput(String),

    /// A cached boot-latency duration string failed to parse.
    #[error("unparsable duration: {0:?}")]
    DurationParse(String),
}
