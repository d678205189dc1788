use std::time::Duration;
use thiserror::Error;

/// Error returned by a circuit-breaker-guarded call.
///
/// `Open` and `Timeout` originate in the breaker itself; `Inner` wraps the
/// guarded operation's own error unchanged (after recording it as a failure).
#[derive(Debug, Error)]
pub enum CircuitError<E> {
    #[error("circuit breaker '{name}' is open, retry in {retry_after:?}")]
    Open { name: String, retry_after: Duration },

    #[error("circuit breaker '{name}' timed out the call after {timeout:?}")]
    Timeout { name: String, timeout: Duration },

    #[error(transparent)]
    Inner(E),
}

impl<E> CircuitError<E> {
    /// Whether the failure was produced by the breaker rather than the call.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CircuitError::Open { .. })
    }
}
